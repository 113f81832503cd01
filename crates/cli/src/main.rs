use std::io;

use clap::Parser;

use tenderdesk_cli::{Cli, execute};
use tenderdesk_storage::{FileBlobStore, LoadOutcome, RecordStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;

    tenderdesk_observability::init_with(config.log_format);

    tracing::info!(
        data_dir = %config.data_dir.display(),
        storage_key = %config.storage_key,
        "opening tender store"
    );

    let mut store = RecordStore::with_key(
        FileBlobStore::new(&config.data_dir),
        config.storage_key.clone(),
    );
    if let LoadOutcome::Seeded { reason, .. } = store.load() {
        tracing::debug!(?reason, "started from the seed dataset");
    }
    if let Some(err) = store.read_error() {
        tracing::warn!(error = %err, "stored tenders could not be read; changes will not be saved");
    } else if let Some(err) = store.last_persist_error() {
        tracing::warn!(error = %err, "tender store is running without persistence");
    }

    let stdout = io::stdout();
    let stdin = io::stdin();
    execute(&mut store, cli.command, &mut stdout.lock(), &mut stdin.lock())
}
