//! Batch command - ingest every matching image as its own record.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use recit_core::IngestOutcome;

use super::scan::{build_coordinator, load_images, report_outcome};
use super::Context;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Do not keep scanned images on the records
    #[arg(long)]
    no_image: bool,

    /// Stop at the first failed scan
    #[arg(long)]
    fail_fast: bool,
}

pub async fn run(args: BatchArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg" | "tiff" | "bmp")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to scan", style("ℹ").blue(), files.len());

    let coordinator = build_coordinator(ctx, args.model_dir, args.no_image)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut saved = 0usize;
    let mut rejected = 0usize;
    let mut failed = 0usize;

    // Each file becomes its own record; the coordinator serializes the
    // persisting stages.
    for path in &files {
        let images = match load_images(std::slice::from_ref(path)) {
            Ok(images) => images,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable file");
                failed += 1;
                pb.inc(1);
                if args.fail_fast {
                    pb.finish_and_clear();
                    return Err(e);
                }
                continue;
            }
        };

        let outcome = coordinator.ingest(images).await;
        pb.suspend(|| report_outcome(&outcome, path));

        match &outcome {
            IngestOutcome::Success(_) => saved += 1,
            IngestOutcome::Rejected(_) => rejected += 1,
            IngestOutcome::Failed(e) => {
                failed += 1;
                if args.fail_fast {
                    pb.finish_and_clear();
                    anyhow::bail!("batch stopped: {}", e);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    println!(
        "{} {} saved, {} rejected, {} failed in {:.1}s",
        style("✓").green(),
        saved,
        rejected,
        failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
