//! Match engine: runs the detector over the query image and the corpus.

use crate::scanner::{ImageWalk, ScanError};
use snout_core::{Detect, Thresholds};
use std::path::{Path, PathBuf};

/// Collect the corpus paths whose images contain the target class.
///
/// The query image gates the scan: when it yields no detections there is
/// nothing to match against and the walk is never started. "Matching" is
/// presence of the target class in a candidate, not similarity between the
/// query instance and the candidate instance.
///
/// Per-image detection failures soft-fail inside the detector; a directory
/// that cannot be listed aborts the whole scan.
pub fn find_matches<D: Detect>(
    detector: &mut D,
    query: &Path,
    root: &Path,
    target_class: usize,
    thresholds: Thresholds,
) -> Result<Vec<PathBuf>, ScanError> {
    let query_hits = detector.detect(query, target_class, thresholds);
    if query_hits.is_empty() {
        tracing::info!(
            query = %query.display(),
            "no target detections in the query image, skipping scan"
        );
        return Ok(Vec::new());
    }
    tracing::debug!(
        query = %query.display(),
        detections = query_hits.len(),
        "query image accepted"
    );

    let mut matches = Vec::new();
    for item in ImageWalk::new(root) {
        let path = item?;
        let hits = detector.detect(&path, target_class, thresholds);
        if !hits.is_empty() {
            tracing::debug!(path = %path.display(), detections = hits.len(), "match");
            matches.push(path);
        }
    }

    tracing::info!(root = %root.display(), matches = matches.len(), "scan complete");
    Ok(matches)
}
