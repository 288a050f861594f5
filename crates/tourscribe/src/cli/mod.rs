//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the tourscribe binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{RunOverrides, extract_agenda, load_config, read_agenda};
#[cfg(feature = "gemini")]
pub use run::{plan_agenda, plan_and_write, write_tour};
