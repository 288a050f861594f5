//! Tourscribe CLI binary.
//!
//! This binary provides command-line access to tourscribe:
//! - Plan a route agenda for a trip
//! - Write a narrated tour from an agenda
//! - Inspect what the extractor recovers from an agenda

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, RunOverrides, extract_agenda, load_config, read_agenda};

    // Secrets may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs)?;

    let overrides = RunOverrides {
        max_revisions: cli.max_revisions,
        model: cli.model.clone(),
        strict: cli.strict,
        tier: cli.tier.clone(),
        no_retry: cli.no_retry,
    };
    let config = load_config(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Commands::Extract { agenda } => {
            let text = read_agenda(&agenda).await?;
            println!("{}", extract_agenda(&text)?);
        }

        #[cfg(feature = "gemini")]
        Commands::Plan { trip } => match cli::plan_agenda(&config, &overrides, &trip).await? {
            Some(agenda) => println!("{}", agenda),
            None => tracing::warn!("Planner returned no agenda"),
        },

        #[cfg(feature = "gemini")]
        Commands::Write { agenda, output } => {
            let text = read_agenda(&agenda).await?;
            cli::write_tour(&config, &overrides, Some(&text), &output).await?;
        }

        #[cfg(feature = "gemini")]
        Commands::Tour {
            trip,
            output,
            save_agenda,
        } => {
            cli::plan_and_write(&config, &overrides, &trip, &output, save_agenda.as_deref())
                .await?;
        }

        #[cfg(not(feature = "gemini"))]
        _ => {
            let _ = config;
            return Err("this build has no generation provider; rebuild with --features gemini".into());
        }
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `--verbose`. Logs go to stderr so stdout carries
/// only command output.
#[cfg(not(feature = "observability"))]
fn init_tracing(verbose: bool, json_logs: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::try_from_default_env()?,
        Err(_) => EnvFilter::try_new(default_level)?,
    };

    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[cfg(feature = "observability")]
fn init_tracing(verbose: bool, json_logs: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tourscribe::observability::{ObservabilityConfig, init_observability};

    init_observability(
        ObservabilityConfig::new("tourscribe")
            .with_log_level(if verbose { "debug" } else { "info" })
            .with_json_logs(json_logs),
    )
}
