//! List command - show stored records.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use recit_core::models::Record;
use recit_core::{JsonStore, RecordStore};

use super::Context;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only records in this category
    #[arg(long)]
    category: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Record fields exposed in listings (the image payload is elided).
#[derive(Serialize)]
struct RecordView {
    id: String,
    created_at: String,
    category: String,
    title: String,
    body: String,
    has_image: bool,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.to_string(),
            created_at: record.created_at.to_rfc3339(),
            category: record.category.clone(),
            title: record.title.clone(),
            body: record.body.clone(),
            has_image: record.image.is_some(),
        }
    }
}

pub async fn run(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = JsonStore::open(&ctx.data_file)?;

    let records: Vec<Record> = store
        .list_records()?
        .into_iter()
        .filter(|r| match &args.category {
            Some(category) => r.category.eq_ignore_ascii_case(category),
            None => true,
        })
        .collect();

    let views: Vec<RecordView> = records.iter().map(RecordView::from).collect();
    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&views)?,
        OutputFormat::Csv => to_csv(&views)?,
        OutputFormat::Text => to_text(&views),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)?;
            println!(
                "{} Wrote {} records to {}",
                style("✓").green(),
                views.len(),
                path.display()
            );
        }
        None => println!("{}", output),
    }

    Ok(())
}

fn to_csv(views: &[RecordView]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for view in views {
        writer.serialize(view)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV output: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

fn to_text(views: &[RecordView]) -> String {
    if views.is_empty() {
        return "No records stored.".to_string();
    }

    let mut lines = Vec::with_capacity(views.len());
    for view in views {
        lines.push(format!(
            "{}  {}  [{}]  {}",
            style(&view.id).cyan(),
            &view.created_at[..10],
            style(&view.category).magenta(),
            view.title
        ));
    }
    lines.join("\n")
}
