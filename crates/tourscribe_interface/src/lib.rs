//! Capability traits for tourscribe.
//!
//! The pipeline never talks to a concrete backend. It receives handles that
//! implement these traits, which keeps every stage testable with canned
//! responses.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod json;
mod traits;

pub use json::extract_json;
pub use traits::{AgendaSource, DocumentSink, JsonMode, TourDriver};
