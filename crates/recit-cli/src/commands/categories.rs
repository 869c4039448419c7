//! Categories command - show the category aggregates.

use clap::Args;
use console::style;

use recit_core::{JsonStore, RecordStore};

use super::Context;

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: CategoriesArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = JsonStore::open(&ctx.data_file)?;
    let mut entries = store.list_category_entries()?;
    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.title.cmp(&b.title)));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No categories yet.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{:>5}  {}  ({}, {})",
            style(entry.count).bold(),
            style(&entry.title).magenta(),
            entry.icon,
            entry.color
        );
    }

    Ok(())
}
