//! YOLO animal-face detector via ONNX Runtime.
//!
//! Runs a fixed-input YOLO model over decoded images and reduces the raw
//! grid predictions to class-filtered, NMS-deduplicated bounding boxes.

use crate::types::{BoundingBox, Detect, Thresholds};
use image::imageops::FilterType;
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

const YOLO_INPUT_SIZE: usize = 416;
/// Per-prediction layout: cx, cy, w, h, objectness, then one score per class.
const BOX_FIELDS: usize = 5;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("model file not found: {0}")]
    ModelNotFound(String),
    #[error("class name list is empty")]
    NoLabels,
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
    #[error("image {0} has zero width or height")]
    EmptyImage(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

/// YOLO-based detector for a single target class.
///
/// The loaded model is read-only state; nothing persists across `detect`
/// calls.
pub struct SnoutDetector {
    session: Session,
    num_outputs: usize,
    num_classes: usize,
    input_size: usize,
}

impl SnoutDetector {
    /// Load the YOLO ONNX model from the given path.
    ///
    /// `labels` is the ordered class-name list the model was trained with;
    /// its length fixes the per-prediction row stride.
    pub fn load(model_path: &Path, labels: &[String]) -> Result<Self, DetectorError> {
        if labels.is_empty() {
            return Err(DetectorError::NoLabels);
        }
        if !model_path.exists() {
            return Err(DetectorError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|o| o.name().to_string())
            .collect();

        tracing::info!(
            path = %model_path.display(),
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?output_names,
            classes = labels.len(),
            "loaded YOLO model"
        );

        Ok(Self {
            session,
            num_outputs: output_names.len(),
            num_classes: labels.len(),
            input_size: YOLO_INPUT_SIZE,
        })
    }

    /// Detect target-class instances in the image at `path`, returning boxes
    /// in confidence-descending order.
    ///
    /// Soft-fail boundary: a file that cannot be decoded or run through the
    /// model yields an empty set, so one bad image cannot abort a batch scan.
    pub fn detect(
        &mut self,
        path: &Path,
        target_class: usize,
        thresholds: Thresholds,
    ) -> Vec<BoundingBox> {
        match self.try_detect(path, target_class, thresholds) {
            Ok(boxes) => boxes,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "detection failed, treating as empty"
                );
                Vec::new()
            }
        }
    }

    fn try_detect(
        &mut self,
        path: &Path,
        target_class: usize,
        thresholds: Thresholds,
    ) -> Result<Vec<BoundingBox>, DetectorError> {
        let img = decode_image(path)?;
        let (width, height) = img.dimensions();

        let input = image_tensor(&img, self.input_size);
        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let mut detections = Vec::new();
        for idx in 0..self.num_outputs {
            let (_, data) = outputs[idx]
                .try_extract_tensor::<f32>()
                .map_err(|e| DetectorError::InferenceFailed(format!("output {idx}: {e}")))?;
            decode_predictions(
                data,
                self.num_classes,
                target_class,
                thresholds.confidence,
                width as f32,
                height as f32,
                &mut detections,
            );
        }

        Ok(nms(detections, thresholds.iou))
    }
}

impl Detect for SnoutDetector {
    fn detect(
        &mut self,
        path: &Path,
        target_class: usize,
        thresholds: Thresholds,
    ) -> Vec<BoundingBox> {
        SnoutDetector::detect(self, path, target_class, thresholds)
    }
}

/// Decode an image file to RGB. A decodable file with zero width or height
/// counts as a decode failure.
fn decode_image(path: &Path) -> Result<RgbImage, DetectorError> {
    let img = image::open(path)
        .map_err(|source| DetectorError::Decode {
            path: path.display().to_string(),
            source,
        })?
        .to_rgb8();

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectorError::EmptyImage(path.display().to_string()));
    }
    Ok(img)
}

/// Resize to the fixed square network input and scale RGB pixels to [0,1]
/// in NCHW order. Plain resize, no letterboxing or cropping.
fn image_tensor(img: &RgbImage, size: usize) -> Array4<f32> {
    let resized = image::imageops::resize(img, size as u32, size as u32, FilterType::Triangle);

    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        tensor[[0, 0, y as usize, x as usize]] = r as f32 / 255.0;
        tensor[[0, 1, y as usize, x as usize]] = g as f32 / 255.0;
        tensor[[0, 2, y as usize, x as usize]] = b as f32 / 255.0;
    }
    tensor
}

/// Decode one raw output tensor: rows of `[cx, cy, w, h, objectness,
/// class scores...]` with box geometry normalized to [0,1].
///
/// Confidence is the winning class score alone. The exported model folds
/// objectness into the per-class scores, so it is not multiplied in again.
/// Geometry is rescaled by the ORIGINAL image dimensions, not the network
/// input size.
fn decode_predictions(
    data: &[f32],
    num_classes: usize,
    target_class: usize,
    confidence_threshold: f32,
    image_width: f32,
    image_height: f32,
    out: &mut Vec<BoundingBox>,
) {
    let row = BOX_FIELDS + num_classes;
    for pred in data.chunks_exact(row) {
        let scores = &pred[BOX_FIELDS..];
        let (class_id, confidence) = scores.iter().copied().enumerate().fold(
            (0usize, f32::NEG_INFINITY),
            |(best_id, best), (id, score)| {
                if score > best {
                    (id, score)
                } else {
                    (best_id, best)
                }
            },
        );

        if confidence <= confidence_threshold || class_id != target_class {
            continue;
        }

        let width = pred[2] * image_width;
        let height = pred[3] * image_height;
        if width <= 0.0 || height <= 0.0 {
            continue;
        }
        let x = pred[0] * image_width - width / 2.0;
        let y = pred[1] * image_height - height / 2.0;

        out.push(BoundingBox {
            x,
            y,
            width,
            height,
            confidence,
            class_id,
        });
    }
}

/// Class-aware non-maximum suppression.
///
/// The stable sort keeps equal-confidence boxes in original detection order,
/// so suppression is deterministic. Output stays confidence-descending.
fn nms(mut detections: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; detections.len()];

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(detections[i].clone());

        for j in (i + 1)..detections.len() {
            if suppressed[j] || detections[j].class_id != detections[i].class_id {
                continue;
            }
            if iou(&detections[i], &detections[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    keep
}

/// Compute Intersection-over-Union between two bounding boxes.
fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);

    let inter_w = (x2 - x1).max(0.0);
    let inter_h = (y2 - y1).max(0.0);
    let inter_area = inter_w * inter_h;

    let area_a = a.width * a.height;
    let area_b = b.width * b.height;
    let union_area = area_a + area_b - inter_area;

    if union_area > 0.0 {
        inter_area / union_area
    } else {
        0.0
    }
}
