//! Error types for tourscribe.
//!
//! This crate provides the error types shared by every tourscribe crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use tourscribe_error::{TourscribeResult, HttpError};
//!
//! fn fetch_agenda() -> TourscribeResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_agenda() {
//!     Ok(agenda) => println!("Got: {}", agenda),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod gemini;
mod http;
mod json;
mod rate_limit;
mod tour;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{TourscribeError, TourscribeErrorKind, TourscribeResult};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use http::HttpError;
pub use json::JsonError;
pub use rate_limit::{RateLimitError, RateLimitErrorKind};
pub use tour::{TourError, TourErrorKind};
