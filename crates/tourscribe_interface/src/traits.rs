//! Trait definitions for generation backends, sinks and agenda sources.

use crate::extract_json;
use async_trait::async_trait;
use std::sync::Arc;
use tourscribe_core::{GenerateRequest, GenerateResponse, ResponseFormat, RouteLabel, TourDocument};
use tourscribe_error::{JsonError, TourscribeResult};

/// Text-generation capability every backend implements.
///
/// Given a prompt, persona instruction and optional tools, return text or fail.
#[async_trait]
pub trait TourDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gemini-2.5-flash").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<D: TourDriver + ?Sized> TourDriver for &D {
    async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<D: TourDriver + ?Sized> TourDriver for Box<D> {
    async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<D: TourDriver + ?Sized> TourDriver for Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Structured JSON output on top of a [`TourDriver`].
///
/// Every driver gets this for free: the request is switched to
/// [`ResponseFormat::Json`]. A structured output is returned as is, a reply
/// that is a JSON document on its own is parsed whole, and anything else
/// goes through [`extract_json`] to strip fences and surrounding chatter.
#[async_trait]
pub trait JsonMode: TourDriver {
    /// Generate and parse a JSON reply.
    ///
    /// # Errors
    ///
    /// Returns the driver's error on transport failure, or a [`JsonError`]
    /// when the reply holds no parseable JSON.
    async fn generate_json(&self, req: &GenerateRequest) -> TourscribeResult<serde_json::Value> {
        let req = req.clone().with_response_format(ResponseFormat::Json);
        let response = self.generate(&req).await?;
        if let Some(value) = response.json() {
            return Ok(value.clone());
        }
        let text = response
            .text()
            .ok_or_else(|| JsonError::new("Empty response where JSON was expected"))?;
        if let Ok(value) = serde_json::from_str(text.trim()) {
            return Ok(value);
        }
        let json = extract_json(&text)?;

        serde_json::from_str(&json).map_err(|e| {
            tracing::warn!(error = %e, length = json.len(), "Malformed JSON in response");
            JsonError::new(format!("Failed to parse JSON response: {}", e)).into()
        })
    }
}

impl<D: TourDriver + ?Sized> JsonMode for D {}

/// Destination for a finished tour.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Persist the document, preserving segment order and titles.
    async fn write(&self, route: &RouteLabel, document: &TourDocument) -> TourscribeResult<()>;
}

/// Upstream producer of agenda text.
#[async_trait]
pub trait AgendaSource: Send + Sync {
    /// Produce the agenda, or `None` when nothing was produced.
    async fn agenda(&self) -> TourscribeResult<Option<String>>;
}
