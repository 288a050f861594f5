//! Text-generation provider integrations for tourscribe.
//!
//! Each provider sits behind its own feature flag.
//!
//! - **Gemini** (Google) - enable with the `gemini` feature
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use tourscribe_core::{GenerateRequest, Message};
//! use tourscribe_interface::TourDriver;
//! use tourscribe_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Hello")])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{:?}", response.text());
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    GeminiCandidate, GeminiClient, GeminiContent, GeminiGenerationConfig, GeminiPart,
    GeminiRequest, GeminiResponse, GeminiSafetySetting, GeminiTool, api_key_from_env,
};
