//! Gemini REST client with per-model rate limiting.

use super::GeminiResult;
use super::dto::{
    GeminiContent, GeminiErrorEnvelope, GeminiGenerationConfig, GeminiRequest, GeminiResponse,
    GeminiSafetySetting, GeminiTool,
};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tourscribe_core::{
    FinishReason, GenerateRequest, GenerateResponse, Output, ResponseFormat, Role, Tool,
};
use tourscribe_error::{GeminiError, GeminiErrorKind, TourscribeResult};
use tourscribe_interface::TourDriver;
use tourscribe_rate_limit::{RateLimiter, Tier, TierConfig, TourscribeConfig};
use tracing::{debug, error, instrument, warn};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Read the API key from `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
///
/// # Errors
///
/// Returns [`GeminiErrorKind::MissingApiKey`] if neither is set to a
/// non-empty value.
pub fn api_key_from_env() -> GeminiResult<String> {
    ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.trim().is_empty())
        .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey))
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Requests may name a model; otherwise the client default is used. Each
/// model gets its own [`RateLimiter`] built from the base tier with that
/// model's overrides, created on first use.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model_name: String,
    base_tier: TierConfig,
    limiters: Arc<Mutex<HashMap<String, RateLimiter<TierConfig>>>>,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let limiter_count = self
            .limiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("base_tier", &self.base_tier.name())
            .field("cached_limiters", &limiter_count)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client without rate limits, reading the key from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is set or the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tourscribe_models::GeminiClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> TourscribeResult<Self> {
        Ok(Self::with_api_key(api_key_from_env()?, TierConfig::unlimited())?)
    }

    /// Create a client using the Gemini tier from configuration.
    ///
    /// `tier_name` falls back to the configured default tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the tier is unknown, no API key is set, or the
    /// HTTP client cannot be built.
    #[instrument(name = "gemini_client_new_with_config", skip(config))]
    pub fn new_with_config(
        config: &TourscribeConfig,
        tier_name: Option<&str>,
    ) -> TourscribeResult<Self> {
        let tier = config.require_tier("gemini", tier_name)?;
        debug!(tier = %tier.name, "Using configured Gemini tier");
        Ok(Self::with_api_key(api_key_from_env()?, tier)?)
    }

    /// Create a client from an explicit key and tier.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiErrorKind::MissingApiKey`] for a blank key, or
    /// [`GeminiErrorKind::ClientCreation`] if the HTTP client cannot be built.
    pub fn with_api_key(api_key: impl Into<String>, tier: TierConfig) -> GeminiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey));
        }

        let http = Client::builder()
            .user_agent(concat!("tourscribe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            http,
            api_key,
            base_url: GEMINI_API_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            base_tier: tier,
            limiters: Arc::new(Mutex::new(HashMap::new())),
            no_retry: false,
            max_retries: None,
            retry_backoff_ms: None,
        })
    }

    /// Set the default model used when a request names none.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = normalize_model(&model.into()).to_string();
        self
    }

    /// Point the client at another endpoint root (e.g. a proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override retry behaviour.
    ///
    /// * `no_retry` - attempt each request once
    /// * `max_retries` - override the number of retries
    /// * `retry_backoff_ms` - override the initial backoff
    pub fn with_retry(
        mut self,
        no_retry: bool,
        max_retries: Option<usize>,
        retry_backoff_ms: Option<u64>,
    ) -> Self {
        self.no_retry = no_retry;
        self.max_retries = max_retries;
        self.retry_backoff_ms = retry_backoff_ms;
        // Limiters capture retry settings at creation
        self.limiters = Arc::new(Mutex::new(HashMap::new()));
        self
    }

    fn limiter_for(&self, model: &str) -> RateLimiter<TierConfig> {
        let mut limiters = self.limiters.lock().unwrap_or_else(PoisonError::into_inner);
        limiters
            .entry(model.to_string())
            .or_insert_with(|| {
                debug!(model, "Creating rate limiter for model");
                RateLimiter::new_with_retry(
                    self.base_tier.for_model(model),
                    self.no_retry,
                    self.max_retries,
                    self.retry_backoff_ms,
                )
            })
            .clone()
    }

    /// Rough token estimate: four characters per token.
    fn estimate_tokens(req: &GenerateRequest) -> u64 {
        let prompt = (req.prompt_chars() / 4) as u64;
        prompt + req.max_tokens().unwrap_or(1000) as u64
    }

    /// Build the wire request for a [`GenerateRequest`].
    pub(crate) fn convert_request(req: &GenerateRequest) -> GeminiResult<GeminiRequest> {
        let contents: Vec<GeminiContent> = req
            .messages()
            .iter()
            .map(|message| {
                let role = match message.role() {
                    Role::User => "user",
                    Role::Model => "model",
                };
                GeminiContent::new(Some(role), message.content().clone())
            })
            .collect();

        if contents.is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::ApiRequest(
                "Request must contain at least one message".to_string(),
            )));
        }

        let tools: Vec<GeminiTool> = req
            .tools()
            .iter()
            .map(|tool| match tool {
                Tool::WebSearch => GeminiTool::google_search(),
                Tool::Maps => GeminiTool::google_maps(),
            })
            .collect();

        let generation_config = GeminiGenerationConfig {
            temperature: *req.temperature(),
            max_output_tokens: *req.max_tokens(),
            response_mime_type: match req.response_format() {
                ResponseFormat::Json => Some("application/json".to_string()),
                ResponseFormat::Text => None,
            },
        };

        GeminiRequest::builder()
            .contents(contents)
            .system_instruction(
                req.system_instruction()
                    .as_ref()
                    .map(|text| GeminiContent::new(None, text.clone())),
            )
            .tools(tools)
            .generation_config(Some(generation_config))
            .safety_settings(vec![GeminiSafetySetting::new(
                "HARM_CATEGORY_DANGEROUS_CONTENT",
                "BLOCK_ONLY_HIGH",
            )])
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))
    }

    /// Turn a wire response into a [`GenerateResponse`].
    ///
    /// Empty or blocked responses are errors, so callers never see blank text.
    pub(crate) fn convert_response(
        response: &GeminiResponse,
        format: ResponseFormat,
    ) -> GeminiResult<GenerateResponse> {
        if let Some(reason) = response
            .prompt_feedback()
            .as_ref()
            .and_then(|feedback| feedback.block_reason().clone())
        {
            warn!(block_reason = %reason, "Gemini blocked the prompt");
            return Err(GeminiError::new(GeminiErrorKind::SafetyBlocked(reason)));
        }

        let Some(candidate) = response.candidates().first() else {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse));
        };

        let finish = candidate.finish_reason().as_deref().map(map_finish_reason);
        let text = candidate
            .content()
            .as_ref()
            .map(GeminiContent::joined_text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            for rating in candidate.safety_ratings() {
                warn!(
                    category = %rating.category(),
                    probability = %rating.probability(),
                    "Candidate safety rating"
                );
            }
            return Err(match (finish, candidate.finish_reason()) {
                (Some(FinishReason::ContentFilter), Some(reason)) => {
                    GeminiError::new(GeminiErrorKind::SafetyBlocked(reason.clone()))
                }
                _ => GeminiError::new(GeminiErrorKind::EmptyResponse),
            });
        }

        if finish == Some(FinishReason::Length) {
            warn!(chars = text.len(), "Gemini response truncated at token limit");
        }

        let output = match format {
            ResponseFormat::Json => match serde_json::from_str(&text) {
                Ok(value) => Output::Json(value),
                Err(_) => Output::Text(text),
            },
            ResponseFormat::Text => Output::Text(text),
        };

        let response = GenerateResponse::new(vec![output]);
        Ok(match finish {
            Some(reason) => response.with_finish_reason(reason),
            None => response,
        })
    }

    async fn post(&self, model: &str, body: &GeminiRequest) -> GeminiResult<GeminiResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
                .map(|envelope| match envelope.error.status {
                    Some(code) => format!("{} ({})", envelope.error.message, code),
                    None => envelope.error.message,
                })
                .unwrap_or(body);
            error!(status = %status, message = %message, "Gemini API returned error");
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json::<GeminiResponse>().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            GeminiError::new(GeminiErrorKind::ResponseParse(e.to_string()))
        })
    }

    #[instrument(
        name = "gemini_generate",
        skip(self, req),
        fields(model = tracing::field::Empty, messages = req.messages().len(), format = %req.response_format())
    )]
    async fn generate_internal(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let model = req
            .model()
            .as_deref()
            .map(normalize_model)
            .unwrap_or(&self.model_name)
            .to_string();
        tracing::Span::current().record("model", model.as_str());

        let body = Self::convert_request(req)?;
        let limiter = self.limiter_for(&model);
        let estimated_tokens = Self::estimate_tokens(req);
        debug!(estimated_tokens, "Dispatching Gemini request");

        let response = limiter
            .execute(estimated_tokens, || self.post(&model, &body))
            .await?;

        Self::convert_response(&response, *req.response_format())
    }
}

fn normalize_model(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Other,
    }
}

#[async_trait]
impl TourDriver for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
