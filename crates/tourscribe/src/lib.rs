//! Tourscribe - audio tour scripts from a route agenda
//!
//! Tourscribe turns a route agenda (a numbered list of stops with summaries
//! and writer directives) into a polished, continuity-aware audio tour. Each
//! stop is drafted by a writer persona and reviewed by a director persona
//! until approved or the revision cap is reached.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tourscribe::{GeminiClient, MarkdownSink, TourConfig, TourOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new()?;
//!     let orchestrator = TourOrchestrator::new(client, TourConfig::default())?;
//!
//!     let agenda = std::fs::read_to_string("agenda.md")?;
//!     let sink = MarkdownSink::new("tour_script.md");
//!     let run = orchestrator.run_and_render(Some(&agenda), &sink).await?;
//!     println!("{} stops", run.document().len());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` (default) - Google Gemini provider
//! - `observability` - OpenTelemetry span export to stdout
//!
//! # Architecture
//!
//! - `tourscribe_error` - Error types
//! - `tourscribe_core` - Requests, responses and tour domain types
//! - `tourscribe_interface` - `TourDriver`, `DocumentSink` and `AgendaSource` traits
//! - `tourscribe_rate_limit` - Configuration, rate limiting and retry
//! - `tourscribe_models` - Provider implementations
//! - `tourscribe_narrative` - Extraction and the writer/director revision loop
//!
//! This crate (`tourscribe`) re-exports everything for convenience.

pub use tourscribe_core::*;
pub use tourscribe_error::*;
pub use tourscribe_interface::*;
pub use tourscribe_narrative::*;
pub use tourscribe_rate_limit::*;

#[cfg(feature = "gemini")]
pub use tourscribe_models::*;

#[cfg(feature = "observability")]
pub mod observability;
