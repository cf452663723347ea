use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use snout_core::{labels, SnoutDetector, Thresholds};

mod config;
mod engine;
mod output;
mod scanner;

use config::RunConfig;

#[derive(Parser)]
#[command(
    name = "snout",
    about = "Find images containing an animal face with a pretrained YOLO detector"
)]
struct Cli {
    /// Run configuration JSON (query_image_path + database_dir)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
    /// YOLO ONNX model file
    #[arg(long, default_value = "yolov3.onnx")]
    model: PathBuf,
    /// Class-name list, one name per line (line index = class id)
    #[arg(long, default_value = "coco.names")]
    names: PathBuf,
    /// Target class name
    #[arg(long, default_value = "dog")]
    class: String,
    /// Confidence threshold
    #[arg(long, default_value_t = 0.5)]
    confidence: f32,
    /// NMS IoU threshold
    #[arg(long, default_value_t = 0.4)]
    iou: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let run = RunConfig::load(&cli.config)
        .with_context(|| format!("loading run configuration from {}", cli.config.display()))?;
    run.validate()?;

    let class_names = labels::load_labels(&cli.names)
        .with_context(|| format!("loading class names from {}", cli.names.display()))?;
    let target_class = labels::class_id(&class_names, &cli.class)?;

    let mut detector = SnoutDetector::load(&cli.model, &class_names)
        .with_context(|| format!("loading detection model from {}", cli.model.display()))?;

    let thresholds = Thresholds {
        confidence: cli.confidence,
        iou: cli.iou,
    };

    let started = chrono::Local::now().naive_local();
    let matches = engine::find_matches(
        &mut detector,
        &run.query_image_path,
        &run.database_dir,
        target_class,
        thresholds,
    )?;

    if matches.is_empty() {
        println!("No matching images found.");
        return Ok(());
    }

    let out_dir = PathBuf::from(output::output_dir_name(started));
    let copied = output::copy_matches(&matches, &out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    println!(
        "Found {} matching images. Copied {} to {}.",
        matches.len(),
        copied,
        out_dir.display()
    );

    Ok(())
}
