//! `tenderdesk-cli`
//!
//! **Responsibility:** the presentation layer over the tender record store.
//!
//! This crate provides:
//! - configuration (environment + command-line flags)
//! - the add/edit form session (open, prefill, submit, cancel)
//! - terminal rendering of tender lists and stats
//! - the `tenderdesk` command dispatcher
//!
//! The store owns all data; this layer re-renders after every mutation.

pub mod commands;
pub mod config;
pub mod render;
pub mod session;

pub use commands::{Cli, Command, execute};
pub use config::AppConfig;
pub use session::{FormMode, FormSession, TenderForm};
