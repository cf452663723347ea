//! snout-core — animal-face detection engine.
//!
//! Runs a pretrained YOLO model via ONNX Runtime and reduces its raw grid
//! predictions to class-filtered, NMS-deduplicated bounding boxes.

pub mod detector;
pub mod labels;
pub mod types;

pub use detector::SnoutDetector;
pub use types::{BoundingBox, Detect, Thresholds};
