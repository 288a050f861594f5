//! Output types from generation responses.

use serde::{Deserialize, Serialize};

/// Supported output types from a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),
    /// Structured JSON output.
    Json(serde_json::Value),
}

/// Why generation stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum FinishReason {
    /// Model completed naturally.
    Stop,
    /// Hit the max token limit.
    Length,
    /// Content was filtered.
    ContentFilter,
    /// Other/unknown reason.
    Other,
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use tourscribe_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse::new(vec![
///     Output::Text("Welcome to ".to_string()),
///     Output::Text("Blacksburg.".to_string()),
/// ]);
///
/// assert_eq!(response.text(), Some("Welcome to Blacksburg.".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    outputs: Vec<Output>,
    /// Why the model stopped, when reported
    finish_reason: Option<FinishReason>,
}

impl GenerateResponse {
    /// Create a response from outputs with no finish reason.
    pub fn new(outputs: Vec<Output>) -> Self {
        Self {
            outputs,
            finish_reason: None,
        }
    }

    /// Attach a finish reason.
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    /// The first structured JSON output, if the backend returned one.
    pub fn json(&self) -> Option<&serde_json::Value> {
        self.outputs.iter().find_map(|output| match output {
            Output::Json(value) => Some(value),
            Output::Text(_) => None,
        })
    }

    /// Concatenate all text outputs (JSON outputs are serialized).
    ///
    /// Returns `None` when the response carries no non-blank text.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .outputs
            .iter()
            .map(|output| match output {
                Output::Text(text) => text.clone(),
                Output::Json(value) => value.to_string(),
            })
            .collect();

        if text.trim().is_empty() { None } else { Some(text) }
    }
}
