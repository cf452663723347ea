//! Materialize matches: timestamped output directory and file copies.

use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Output directory name derived from the run's start time. Second
/// granularity keeps consecutive runs from colliding.
pub fn output_dir_name(started: NaiveDateTime) -> String {
    format!("snout_matches_{}", started.format("%Y%m%d_%H%M%S"))
}

/// Copy each matched file into `out_dir`, preserving file names.
///
/// Returns the number of files copied. A single failed copy is logged and
/// skipped; only failure to create the directory itself is fatal.
pub fn copy_matches(matches: &[PathBuf], out_dir: &Path) -> io::Result<usize> {
    fs::create_dir_all(out_dir)?;

    let mut copied = 0;
    for src in matches {
        let Some(name) = src.file_name() else {
            tracing::warn!(path = %src.display(), "matched path has no file name, skipping");
            continue;
        };
        match fs::copy(src, out_dir.join(name)) {
            Ok(_) => copied += 1,
            Err(err) => {
                tracing::warn!(path = %src.display(), error = %err, "copy failed, skipping");
            }
        }
    }

    Ok(copied)
}
