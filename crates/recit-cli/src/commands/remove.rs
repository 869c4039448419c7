//! Remove command - delete a record and settle its category aggregate.

use std::sync::Arc;

use clap::Args;
use console::style;

use recit_core::models::RecordId;
use recit_core::receipt::CategoryClassifier;
use recit_core::{IngestCoordinator, JsonStore, RemoveOutcome};

use super::{Context, NoExtractor};

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Id of the record to remove
    id: String,
}

pub async fn run(args: RemoveArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = Arc::new(JsonStore::open(&ctx.data_file)?);
    let coordinator = IngestCoordinator::new(
        NoExtractor,
        store,
        CategoryClassifier::default(),
        ctx.config.ingest.clone(),
    );

    let id = RecordId::new(args.id);
    match coordinator.remove_record(&id).await {
        RemoveOutcome::Success => {
            println!("{} Removed record {}", style("✓").green(), style(&id).cyan());
            Ok(())
        }
        RemoveOutcome::Failed(e) => Err(e.into()),
    }
}
