//! Gemini `generateContent` wire types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One text part of a content turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Text payload; absent for non-text parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl GeminiPart {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Borrow the text, if any.
    pub fn as_text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A content turn: a role plus parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiContent {
    /// "user" or "model"; omitted for system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    /// Ordered parts
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    /// A turn with one text part.
    pub fn new(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart::text(text)],
        }
    }

    /// All text parts joined.
    pub fn joined_text(&self) -> String {
        self.parts.iter().filter_map(GeminiPart::as_text).collect()
    }
}

/// Empty object used to switch on a built-in tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiToolConfig {}

/// A built-in grounding tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    /// Google Search grounding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_search: Option<GeminiToolConfig>,
    /// Google Maps grounding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_maps: Option<GeminiToolConfig>,
}

impl GeminiTool {
    /// Google Search tool.
    pub fn google_search() -> Self {
        Self {
            google_search: Some(GeminiToolConfig::default()),
            ..Default::default()
        }
    }

    /// Google Maps tool.
    pub fn google_maps() -> Self {
        Self {
            google_maps: Some(GeminiToolConfig::default()),
            ..Default::default()
        }
    }
}

/// Sampling and output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) temperature: Option<f32>,
    /// Output token cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) max_output_tokens: Option<u32>,
    /// "application/json" for structured replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) response_mime_type: Option<String>,
}

/// A safety filter threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiSafetySetting {
    /// Harm category, e.g. `HARM_CATEGORY_DANGEROUS_CONTENT`
    category: String,
    /// Threshold, e.g. `BLOCK_ONLY_HIGH`
    threshold: String,
}

impl GeminiSafetySetting {
    /// Create a setting.
    pub fn new(category: impl Into<String>, threshold: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            threshold: threshold.into(),
        }
    }
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct GeminiRequest {
    /// Conversation turns
    contents: Vec<GeminiContent>,
    /// Persona instruction
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    /// Grounding tools
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    /// Sampling settings
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    /// Safety filter thresholds
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<GeminiSafetySetting>,
}

impl GeminiRequest {
    /// Creates a new builder for `GeminiRequest`.
    pub fn builder() -> GeminiRequestBuilder {
        GeminiRequestBuilder::default()
    }
}

/// Safety rating attached to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiSafetyRating {
    /// Harm category
    #[serde(default)]
    category: String,
    /// Estimated probability bucket
    #[serde(default)]
    probability: String,
}

/// One generated candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content
    #[serde(default)]
    content: Option<GeminiContent>,
    /// Why generation stopped, e.g. `STOP`, `MAX_TOKENS`, `SAFETY`
    #[serde(default)]
    finish_reason: Option<String>,
    /// Safety ratings
    #[serde(default)]
    safety_ratings: Vec<GeminiSafetyRating>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    /// Set when the prompt was blocked
    #[serde(default)]
    block_reason: Option<String>,
}

/// Response body from `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    /// Prompt-level feedback
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeminiErrorEnvelope {
    pub(crate) error: GeminiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeminiErrorBody {
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) status: Option<String>,
}
