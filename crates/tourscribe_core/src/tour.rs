//! Tour domain types: waypoints, route labels and run settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tourscribe_error::{TourError, TourErrorKind, TourscribeResult};

/// Placeholder for any waypoint field that could not be recovered.
pub const NOT_FOUND: &str = "Not Found";

/// Placeholder route label when the agenda never announces a route.
pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// One narrative stop recovered from an agenda.
///
/// Immutable once extracted. Missing fields hold [`NOT_FOUND`].
///
/// # Examples
///
/// ```
/// use tourscribe_core::{WaypointSpec, NOT_FOUND};
///
/// let stop = WaypointSpec::new("Roanoke", "Railroad hub.", NOT_FOUND);
/// assert_eq!(stop.title(), "Roanoke");
/// assert!(!stop.has_directive());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct WaypointSpec {
    /// Stop heading
    title: String,
    /// Factual summary of the stop
    summary: String,
    /// What the writer should emphasize
    directive: String,
}

impl WaypointSpec {
    /// Create a waypoint from its three fields.
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        directive: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            directive: directive.into(),
        }
    }

    /// Whether the agenda supplied a writer directive for this stop.
    pub fn has_directive(&self) -> bool {
        self.directive != NOT_FOUND
    }
}

/// Name of the route a tour follows.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RouteLabel(String);

impl RouteLabel {
    /// Create a label from text.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label used when no route announcement exists.
    pub fn not_found() -> Self {
        Self(ROUTE_NOT_FOUND.to_string())
    }

    /// Whether this is the sentinel label.
    pub fn is_not_found(&self) -> bool {
        self.0 == ROUTE_NOT_FOUND
    }

    /// Borrow the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// What the orchestrator does when a stop cannot be generated.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FailurePolicy {
    /// Record a gap marker for the stop and keep going
    #[default]
    Lenient,
    /// Abort the run on the first failure
    Strict,
}

/// Run-wide settings, fixed for the duration of one tour.
///
/// Construct through [`TourConfig::builder`], which validates every field.
///
/// # Examples
///
/// ```
/// use tourscribe_core::TourConfig;
///
/// let config = TourConfig::builder()
///     .max_revisions(2)
///     .writer_temperature(0.9)
///     .build()
///     .unwrap();
///
/// assert_eq!(*config.max_revisions(), 2);
/// assert_eq!(*config.director_temperature(), 0.2);
///
/// assert!(TourConfig::builder().max_revisions(0).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct TourConfig {
    /// Model used by both the writer and the director
    generation_model_id: String,
    /// Upper bound on draft/review rounds per stop
    max_revisions: u32,
    /// Sampling temperature for the writer
    writer_temperature: f32,
    /// Sampling temperature for the director
    director_temperature: f32,
    /// Whether the writer may use web search
    writer_web_search: bool,
    /// Per-call deadline for generation requests
    request_timeout: Option<Duration>,
    /// Cap on continuity context characters handed to each prompt
    max_context_chars: Option<usize>,
    /// Reaction to a failed stop
    failure_policy: FailurePolicy,
}

impl TourConfig {
    /// Default generation model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
    /// Default revision cap.
    pub const DEFAULT_MAX_REVISIONS: u32 = 3;
    /// Default writer temperature.
    pub const DEFAULT_WRITER_TEMPERATURE: f32 = 0.7;
    /// Default director temperature.
    pub const DEFAULT_DIRECTOR_TEMPERATURE: f32 = 0.2;

    /// Creates a new tour config builder.
    pub fn builder() -> TourConfigBuilder {
        TourConfigBuilder::default()
    }

    /// Checks every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`TourErrorKind::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> TourscribeResult<()> {
        if self.generation_model_id.trim().is_empty() {
            return Err(invalid("generation model id must not be empty".to_string()));
        }
        if self.max_revisions < 1 {
            return Err(invalid(format!(
                "max_revisions must be at least 1, got {}",
                self.max_revisions
            )));
        }
        for (name, value) in [
            ("writer_temperature", self.writer_temperature),
            ("director_temperature", self.director_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(invalid(format!(
                    "{} must be in [0.0, 2.0], got {}",
                    name, value
                )));
            }
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(invalid("request timeout must be positive".to_string()));
        }
        if self.max_context_chars == Some(0) {
            return Err(invalid("max_context_chars must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            generation_model_id: Self::DEFAULT_MODEL.to_string(),
            max_revisions: Self::DEFAULT_MAX_REVISIONS,
            writer_temperature: Self::DEFAULT_WRITER_TEMPERATURE,
            director_temperature: Self::DEFAULT_DIRECTOR_TEMPERATURE,
            writer_web_search: true,
            request_timeout: None,
            max_context_chars: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[track_caller]
fn invalid(message: String) -> tourscribe_error::TourscribeError {
    TourError::new(TourErrorKind::InvalidConfig(message)).into()
}

/// Builder for `TourConfig`.
#[derive(Debug, Default, Clone)]
pub struct TourConfigBuilder {
    generation_model_id: Option<String>,
    max_revisions: Option<u32>,
    writer_temperature: Option<f32>,
    director_temperature: Option<f32>,
    writer_web_search: Option<bool>,
    request_timeout: Option<Duration>,
    max_context_chars: Option<usize>,
    failure_policy: Option<FailurePolicy>,
}

impl TourConfigBuilder {
    /// Sets the generation model.
    pub fn generation_model_id(mut self, model: impl Into<String>) -> Self {
        self.generation_model_id = Some(model.into());
        self
    }

    /// Sets the revision cap.
    pub fn max_revisions(mut self, value: u32) -> Self {
        self.max_revisions = Some(value);
        self
    }

    /// Sets the writer temperature.
    pub fn writer_temperature(mut self, value: f32) -> Self {
        self.writer_temperature = Some(value);
        self
    }

    /// Sets the director temperature.
    pub fn director_temperature(mut self, value: f32) -> Self {
        self.director_temperature = Some(value);
        self
    }

    /// Enables or disables web search for the writer.
    pub fn writer_web_search(mut self, enabled: bool) -> Self {
        self.writer_web_search = Some(enabled);
        self
    }

    /// Sets the per-call timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Caps the continuity context size.
    pub fn max_context_chars(mut self, chars: usize) -> Self {
        self.max_context_chars = Some(chars);
        self
    }

    /// Sets the failure policy.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Builds and validates the `TourConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is out of range.
    pub fn build(self) -> TourscribeResult<TourConfig> {
        let defaults = TourConfig::default();
        let config = TourConfig {
            generation_model_id: self
                .generation_model_id
                .unwrap_or(defaults.generation_model_id),
            max_revisions: self.max_revisions.unwrap_or(defaults.max_revisions),
            writer_temperature: self
                .writer_temperature
                .unwrap_or(defaults.writer_temperature),
            director_temperature: self
                .director_temperature
                .unwrap_or(defaults.director_temperature),
            writer_web_search: self
                .writer_web_search
                .unwrap_or(defaults.writer_web_search),
            request_timeout: self.request_timeout,
            max_context_chars: self.max_context_chars,
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourscribe_error::TourscribeErrorKind;

    fn invalid_message(result: TourscribeResult<TourConfig>) -> String {
        match result {
            Err(err) => match err.kind() {
                TourscribeErrorKind::Tour(tour) => match &tour.kind {
                    TourErrorKind::InvalidConfig(msg) => msg.clone(),
                    other => panic!("unexpected tour error: {other}"),
                },
                other => panic!("unexpected error: {other}"),
            },
            Ok(config) => panic!("expected validation failure, got {config:?}"),
        }
    }

    #[test]
    fn test_defaults_validate() {
        let config = TourConfig::builder().build().unwrap();
        assert_eq!(config, TourConfig::default());
        assert_eq!(config.generation_model_id(), "gemini-2.5-flash");
        assert_eq!(*config.failure_policy(), FailurePolicy::Lenient);
    }

    #[test]
    fn test_rejects_zero_revisions() {
        let msg = invalid_message(TourConfig::builder().max_revisions(0).build());
        assert!(msg.contains("max_revisions"));
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let msg = invalid_message(TourConfig::builder().director_temperature(2.5).build());
        assert!(msg.contains("director_temperature"));

        let msg = invalid_message(TourConfig::builder().writer_temperature(-0.1).build());
        assert!(msg.contains("writer_temperature"));
    }

    #[test]
    fn test_rejects_blank_model() {
        let msg = invalid_message(TourConfig::builder().generation_model_id("  ").build());
        assert!(msg.contains("model"));
    }

    #[test]
    fn test_rejects_zero_timeout_and_context() {
        invalid_message(
            TourConfig::builder()
                .request_timeout(Duration::from_secs(0))
                .build(),
        );
        invalid_message(TourConfig::builder().max_context_chars(0).build());
    }

    #[test]
    fn test_route_label_sentinel() {
        assert!(RouteLabel::not_found().is_not_found());
        assert!(!RouteLabel::from("I-81 South").is_not_found());
        assert_eq!(RouteLabel::new("I-81 South").to_string(), "I-81 South");
    }

    #[test]
    fn test_failure_policy_parses() {
        assert_eq!("strict".parse::<FailurePolicy>().unwrap(), FailurePolicy::Strict);
        assert_eq!(FailurePolicy::Lenient.to_string(), "lenient");
    }
}
