use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bounding box for one detected instance, in absolute pixel coordinates.
///
/// `x`/`y` is the top-left corner in the original (pre-resize) image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    pub class_id: usize,
}

/// Confidence and NMS overlap thresholds for one detection pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum winning-class score for a prediction to survive.
    pub confidence: f32,
    /// Maximum IoU between two kept boxes of the same class.
    pub iou: f32,
}

/// Maps an image file to the target-class detections found in it.
///
/// The match engine is generic over this seam so tests can drive it with a
/// scripted detector instead of a loaded model.
pub trait Detect {
    fn detect(&mut self, path: &Path, target_class: usize, thresholds: Thresholds)
        -> Vec<BoundingBox>;
}
