//! Command-line flow: load the model, read the image, annotate, report.

use anyhow::Result;

use crate::config::Cli;
use crate::detection::load_model;
use crate::display;
use crate::pipeline::{Pipeline, PipelineOutput, read_image};

/// Run one invocation without opening a window.
///
/// The model is resolved and loaded before the image is read, so an
/// unknown model is reported even when the image is also missing.
pub fn run(args: &Cli) -> Result<PipelineOutput> {
    let registry = args.registry()?;
    let model = load_model(&registry, &args.model, args.inference_params())?;

    let img = read_image(&args.image_path)?;
    log::info!(
        "Image loaded: {} ({}x{})",
        args.image_path.display(),
        img.width(),
        img.height()
    );

    let mut pipeline = Pipeline::new(model)
        .with_verbose(args.verbose)
        .with_keypoint_threshold(args.keypoint_confidence);
    for annotator in args.annotators() {
        pipeline = pipeline.add_annotator(annotator);
    }
    if let Some(debug_dir) = args.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let output = pipeline.run(&img)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output.key_points)?);
    } else {
        print!("{}", output.key_points);
    }

    if let Some(path) = args.fallback_output() {
        display::save(&output.annotated, &path)?;
    }

    Ok(output)
}
