//! Scan command - ingest one receipt from an ordered batch of images.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use recit_core::models::IngestConfig;
use recit_core::receipt::CategoryClassifier;
use recit_core::{IngestCoordinator, IngestOutcome, JsonStore, PureTextExtractor};

use super::Context;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt images, in page order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Do not keep the scanned image on the record
    #[arg(long)]
    no_image: bool,
}

pub async fn run(args: ScanArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    let coordinator = build_coordinator(ctx, args.model_dir, args.no_image)?;
    let images = load_images(&args.images)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Recognizing text...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = coordinator.ingest(images).await;
    pb.finish_and_clear();

    info!("Scan settled in {}ms", start.elapsed().as_millis());

    report_outcome(&outcome, &args.images[0]);

    match outcome {
        IngestOutcome::Failed(e) => Err(e.into()),
        _ => Ok(()),
    }
}

/// Build the ingestion coordinator over the JSON store and the pure-Rust
/// OCR engine.
pub(crate) fn build_coordinator(
    ctx: &Context,
    model_dir: Option<PathBuf>,
    no_image: bool,
) -> anyhow::Result<IngestCoordinator<PureTextExtractor, JsonStore>> {
    let mut ocr_config = ctx.config.ocr.clone();
    ocr_config.model_dir = ctx.model_dir(model_dir);

    let extractor = PureTextExtractor::from_config(ocr_config)?;
    let store = Arc::new(JsonStore::open(&ctx.data_file)?);

    let ingest_config = IngestConfig {
        store_image: ctx.config.ingest.store_image && !no_image,
        ..ctx.config.ingest.clone()
    };

    Ok(IngestCoordinator::new(
        extractor,
        store,
        CategoryClassifier::default(),
        ingest_config,
    ))
}

/// Load receipt images in the order given.
pub(crate) fn load_images(paths: &[PathBuf]) -> anyhow::Result<Vec<DynamicImage>> {
    paths
        .iter()
        .map(|path| {
            image::open(path)
                .map_err(|e| anyhow::anyhow!("failed to open {}: {}", path.display(), e))
        })
        .collect()
}

/// Print one settled outcome.
pub(crate) fn report_outcome(outcome: &IngestOutcome, source: &Path) {
    match outcome {
        IngestOutcome::Success(id) => {
            println!(
                "{} Saved {} as record {}",
                style("✓").green(),
                source.display(),
                style(id).cyan()
            );
        }
        IngestOutcome::Rejected(reason) => {
            println!(
                "{} Scan not saved ({}): {}",
                style("!").yellow(),
                source.display(),
                reason
            );
        }
        IngestOutcome::Failed(e) => {
            println!(
                "{} Scan not saved ({}): {}",
                style("✗").red(),
                source.display(),
                e
            );
        }
    }
}
