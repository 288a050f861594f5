//! Request type for text generation.

use crate::{Message, ResponseFormat, Tool};
use serde::{Deserialize, Serialize};

/// Generation request handed to a [`TourDriver`].
///
/// Carries everything the capability interface needs: persona instruction,
/// conversation, optional research tools, response shape and sampling
/// settings.
///
/// [`TourDriver`]: https://docs.rs/tourscribe_interface
///
/// # Examples
///
/// ```
/// use tourscribe_core::{GenerateRequest, Message, ResponseFormat, Tool};
///
/// let request = GenerateRequest::builder()
///     .system_instruction("You are a tour script writer.")
///     .messages(vec![Message::user("Write about Roanoke")])
///     .tools(vec![Tool::WebSearch])
///     .temperature(0.7)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(*request.response_format(), ResponseFormat::Text);
/// assert_eq!(*request.temperature(), Some(0.7));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Persona instruction applied to the whole exchange
    #[builder(default, setter(into, strip_option))]
    system_instruction: Option<String>,
    /// Research tools the backend may call
    #[builder(default)]
    tools: Vec<Tool>,
    /// Requested response shape
    #[builder(default)]
    response_format: ResponseFormat,
    /// Sampling temperature
    #[builder(default, setter(into, strip_option))]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[builder(default, setter(into, strip_option))]
    max_tokens: Option<u32>,
    /// Model identifier, overriding the backend default
    #[builder(default, setter(into, strip_option))]
    model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Replace the requested response shape.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Total characters across all message bodies and the system instruction.
    pub fn prompt_chars(&self) -> usize {
        let instruction = self.system_instruction.as_ref().map_or(0, String::len);
        instruction + self.messages.iter().map(|m| m.content().len()).sum::<usize>()
    }
}
