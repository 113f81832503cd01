//! Command-line surface and dispatch.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use tenderdesk_core::TenderId;
use tenderdesk_observability::LogFormat;
use tenderdesk_storage::{BlobStore, RecordStore};
use tenderdesk_tenders::{StatusFilter, TenderQuery};

use crate::config::{AppConfig, DATA_DIR_ENV, LOG_FORMAT_ENV, STORAGE_KEY_ENV};
use crate::render::{render_stats, render_table};
use crate::session::{FormSession, TenderForm};

#[derive(Debug, Parser)]
#[command(name = "tenderdesk", version, about = "Track tenders in a local store")]
pub struct Cli {
    /// Directory holding the stored tenders.
    #[arg(long, env = DATA_DIR_ENV, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Key the tender collection is stored under.
    #[arg(long, env = STORAGE_KEY_ENV, global = true)]
    pub storage_key: Option<String>,

    /// Log format on stderr: json or pretty.
    #[arg(long, env = LOG_FORMAT_ENV, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn config(&self) -> anyhow::Result<AppConfig> {
        AppConfig::resolve(
            self.data_dir.clone(),
            self.storage_key.clone(),
            self.log_format,
        )
    }
}

/// Form fields settable from the command line. Unset flags leave the form
/// value alone (empty for add, the current value for edit).
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub org: Option<String>,
    /// Draft, Submitted, Pending, "Missing Docs" or Awarded.
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long)]
    pub deadline: Option<String>,
    #[arg(long)]
    pub note: Option<String>,
}

impl FieldArgs {
    fn apply_to(self, form: &mut TenderForm) {
        let FieldArgs {
            name,
            org,
            status,
            value,
            deadline,
            note,
        } = self;
        for (slot, update) in [
            (&mut form.name, name),
            (&mut form.org, org),
            (&mut form.status, status),
            (&mut form.value, value),
            (&mut form.deadline, deadline),
            (&mut form.note, note),
        ] {
            if let Some(update) = update {
                *slot = update;
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tenders, newest first.
    List {
        /// Case-insensitive text matched against name, id, org and note.
        #[arg(short, long, default_value = "")]
        search: String,
        /// `All` or a single status.
        #[arg(long, default_value = "All")]
        status: StatusFilter,
        #[arg(long)]
        json: bool,
    },
    /// Show tender counts.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Add a tender.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a tender; unspecified fields keep their current values.
    Edit {
        id: TenderId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a tender.
    Remove {
        id: TenderId,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Duplicate a tender under a new id.
    Clone { id: TenderId },
    /// Export every tender as CSV.
    Export {
        /// Output file, or `-` for stdout. Defaults to `tenders.csv`.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Run one command against the store, writing to `out` and reading
/// confirmations from `input`.
pub fn execute<B, W, R>(
    store: &mut RecordStore<B>,
    command: Command,
    out: &mut W,
    input: &mut R,
) -> anyhow::Result<()>
where
    B: BlobStore,
    W: Write,
    R: BufRead,
{
    match command {
        Command::List {
            search,
            status,
            json,
        } => {
            let query = TenderQuery::new(&search, status);
            if json {
                let matches: Vec<_> = store.list(&query).collect();
                serde_json::to_writer_pretty(&mut *out, &matches)?;
                writeln!(out)?;
            } else {
                write!(out, "{}", render_table(store.list(&query)))?;
                writeln!(out)?;
                write!(out, "{}", render_stats(&store.stats()))?;
            }
            return Ok(());
        }
        Command::Stats { json } => {
            if json {
                serde_json::to_writer_pretty(&mut *out, &store.stats())?;
                writeln!(out)?;
            } else {
                write!(out, "{}", render_stats(&store.stats()))?;
            }
            return Ok(());
        }
        Command::Add { fields } => {
            let mut session = FormSession::new();
            session.open_add();
            fields.apply_to(session.form_mut());
            let id = session.submit(store)?;
            writeln!(out, "Added {id}")?;
        }
        Command::Edit { id, fields } => {
            let mut session = FormSession::new();
            session.open_edit(store, &id)?;
            fields.apply_to(session.form_mut());
            session.submit(store)?;
            writeln!(out, "Updated {id}")?;
        }
        Command::Remove { id, yes } => {
            if !yes && !confirm(out, input, &format!("Delete {id}?"))? {
                writeln!(out, "Cancelled.")?;
                return Ok(());
            }
            if store.remove(&id) {
                writeln!(out, "Removed {id}")?;
            } else {
                writeln!(out, "No tender {id}; nothing removed.")?;
            }
        }
        Command::Clone { id } => {
            let copy = store.clone_tender(&id)?;
            writeln!(out, "Cloned {id} as {copy}")?;
        }
        Command::Export { out: path } => {
            let artifact = store.export_csv()?;
            let path = path.unwrap_or_else(|| PathBuf::from(artifact.file_name));
            if path.as_os_str() == "-" {
                writeln!(out, "{}", artifact.body)?;
            } else {
                std::fs::write(&path, &artifact.body)
                    .with_context(|| format!("failed to write export to {path:?}"))?;
                writeln!(out, "Exported {} tenders to {}", store.len(), path.display())?;
            }
            return Ok(());
        }
    }

    // Mutations fall through here to surface persistence and refresh counters.
    if let Some(err) = store.last_persist_error() {
        writeln!(out, "warning: change not saved: {err}")?;
    }
    write!(out, "{}", render_stats(&store.stats()))?;
    Ok(())
}

fn confirm<W: Write, R: BufRead>(out: &mut W, input: &mut R, prompt: &str) -> anyhow::Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    writeln!(out)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
