//! Google Gemini REST client.
//!
//! [`GeminiClient`] posts to the `generateContent` endpoint, keeps one rate
//! limiter per model and retries transient HTTP failures.

mod client;
mod dto;

pub use client::{GeminiClient, api_key_from_env};
pub use dto::{
    GeminiCandidate, GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest,
    GeminiResponse, GeminiSafetySetting, GeminiTool,
};

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, tourscribe_error::GeminiError>;
