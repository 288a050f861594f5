//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tourscribe - turn a driving route into a narrated audio tour
#[derive(Parser, Debug)]
#[command(name = "tourscribe")]
#[command(about = "Turn a driving route into a narrated audio tour", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Additional configuration file, layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Upper bound on draft/review rounds per stop
    #[arg(long, global = true)]
    pub max_revisions: Option<u32>,

    /// Model used by the writer and the director
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Abort on the first stop that fails instead of leaving a gap
    #[arg(long, global = true)]
    pub strict: bool,

    /// Rate limit tier (defaults to the provider's configured tier)
    #[arg(long, global = true)]
    pub tier: Option<String>,

    /// Attempt each API request once
    #[arg(long, global = true)]
    pub no_retry: bool,
}

/// Start and end of a trip.
#[derive(Args, Debug, Clone)]
pub struct TripArgs {
    /// Starting point, e.g. "Blacksburg, Virginia"
    #[arg(long)]
    pub from: String,

    /// Destination
    #[arg(long)]
    pub to: String,

    /// Specific requests to fold into the agenda
    #[arg(long)]
    pub request: Option<String>,
}

/// Where a finished tour is written.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Markdown script path (defaults to the configured output path)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also write one transcript file per stop into this directory
    #[arg(long)]
    pub transcripts: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a route agenda and print it
    Plan {
        #[command(flatten)]
        trip: TripArgs,
    },

    /// Write a tour from an existing agenda
    Write {
        /// Agenda file, or `-` for stdin
        #[arg(long)]
        agenda: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Plan a route agenda, then write the tour
    Tour {
        #[command(flatten)]
        trip: TripArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Save the planned agenda to this file
        #[arg(long)]
        save_agenda: Option<PathBuf>,
    },

    /// Print the route and waypoints recovered from an agenda as JSON
    Extract {
        /// Agenda file, or `-` for stdin
        #[arg(long)]
        agenda: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_write_with_globals() {
        let cli = Cli::parse_from([
            "tourscribe",
            "write",
            "--agenda",
            "agenda.md",
            "--max-revisions",
            "2",
            "--strict",
            "--transcripts",
            "out",
        ]);
        assert_eq!(cli.max_revisions, Some(2));
        assert!(cli.strict);
        match cli.command {
            Commands::Write { agenda, output } => {
                assert_eq!(agenda, PathBuf::from("agenda.md"));
                assert_eq!(output.transcripts, Some(PathBuf::from("out")));
                assert!(output.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_tour() {
        let cli = Cli::parse_from([
            "tourscribe",
            "--model",
            "gemini-2.5-pro",
            "tour",
            "--from",
            "Blacksburg, Virginia",
            "--to",
            "Fayetteville, West Virginia",
        ]);
        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-pro"));
        assert!(matches!(cli.command, Commands::Tour { .. }));
    }
}
