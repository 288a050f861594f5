//! The director: reviews a draft for tone, continuity and accuracy.

use crate::writer::{SEGMENT_SEPARATOR, generation_failure};
use crate::{RevisionState, continuity_window, deadline};
use serde::{Deserialize, Serialize};
use tourscribe_core::{GenerateRequest, Message, ResponseFormat, TourConfig};
use tourscribe_error::{BuilderError, TourscribeErrorKind, TourscribeResult};
use tourscribe_interface::{JsonMode, TourDriver};
use tracing::{debug, instrument, warn};

/// Persona instruction for the tour director.
pub const DIRECTOR_PERSONA: &str = r#"ROLE: You are the Tour Director and Senior Editor.
GOAL: Ensure the script is cohesive, accurate, and flows well.

CONTINUITY CHECK:
You have access to 'PREVIOUS_SECTIONS'. If the current script discusses a topic (e.g., earthquakes) that was introduced in a previous section,
instruct the writer to refer back to it (e.g., "Remember the anti-seismic bracing we saw at the Golden Gate?").

OUTPUT FORMAT:
You must return a JSON object with two fields:
1. "is_ready": boolean (true if approved, false if needs changes)
2. "feedback": string (If false, specific instructions for the writer. If true, a brief commendation.)"#;

/// Context line used when no earlier stop exists.
const NO_PREVIOUS_SECTIONS: &str = "No previous sections.";

/// A director's verdict on one draft.
///
/// # Examples
///
/// ```
/// use tourscribe_narrative::ReviewDecision;
///
/// let decision: ReviewDecision =
///     serde_json::from_str(r#"{"is_ready": false, "feedback": "Slow down."}"#).unwrap();
/// assert!(!decision.is_ready());
///
/// let malformed = ReviewDecision::malformed("missing field `feedback`");
/// assert!(!malformed.is_ready());
/// assert!(malformed.feedback().contains("regenerate"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision {
    #[serde(alias = "approved")]
    is_ready: bool,
    feedback: String,
}

impl ReviewDecision {
    /// Create a decision.
    pub fn new(is_ready: bool, feedback: impl Into<String>) -> Self {
        Self {
            is_ready,
            feedback: feedback.into(),
        }
    }

    /// Rejection substituted for an unreadable payload.
    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::new(
            false,
            format!("JSON Error: {}. Please regenerate.", reason),
        )
    }

    /// Whether the draft is approved.
    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// Instructions for the writer, or a commendation on approval.
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Split into `(approved, feedback)`.
    pub fn into_parts(self) -> (bool, String) {
        (self.is_ready, self.feedback)
    }
}

/// Reviews drafts and always yields a decision for well-formed or
/// malformed replies alike.
#[derive(Debug, Clone)]
pub struct ReviewGate<D> {
    driver: D,
}

impl<D> ReviewGate<D> {
    /// Create a director over a driver handle.
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Director prompt for the given state.
    pub fn build_prompt(state: &RevisionState, config: &TourConfig) -> String {
        let history = continuity_window(state.prior_segments(), *config.max_context_chars());
        let previous = if history.is_empty() {
            NO_PREVIOUS_SECTIONS.to_string()
        } else {
            history.join(SEGMENT_SEPARATOR)
        };

        format!(
            "PREVIOUS SECTIONS (Context):\n{}\n\n\
             CURRENT DRAFT TO REVIEW:\n{}\n\n\
             Review this draft.\n\
             1. Is the tone correct?\n\
             2. Does it ignore context from previous sections?\n\
             3. Is it accurate and not misleading?\n\n\
             Provide your decision in JSON.",
            previous,
            state.draft()
        )
    }

    /// Full generation request for the given state.
    pub fn request(state: &RevisionState, config: &TourConfig) -> TourscribeResult<GenerateRequest> {
        GenerateRequest::builder()
            .messages(vec![Message::user(Self::build_prompt(state, config))])
            .system_instruction(DIRECTOR_PERSONA)
            .response_format(ResponseFormat::Json)
            .temperature(*config.director_temperature())
            .model(config.generation_model_id().clone())
            .build()
            .map_err(|e| BuilderError::request("director", e).into())
    }
}

impl<D: TourDriver> ReviewGate<D> {
    /// Review the current draft.
    ///
    /// Unparseable or incomplete replies become a rejection with diagnostic
    /// feedback so the loop can continue.
    ///
    /// # Errors
    ///
    /// Returns a generation failure when the driver itself fails or the
    /// configured deadline expires.
    #[instrument(
        name = "director",
        skip_all,
        fields(
            title = %state.waypoint().title(),
            revision = state.revision_count(),
            approved = tracing::field::Empty,
        )
    )]
    pub async fn review(
        &self,
        state: &RevisionState,
        config: &TourConfig,
    ) -> TourscribeResult<ReviewDecision> {
        let request = Self::request(state, config)?;
        let reply = deadline::within(*config.request_timeout(), self.driver.generate_json(&request)).await;

        let decision = match reply {
            Ok(value) => match serde_json::from_value::<ReviewDecision>(value) {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(error = %e, "Director decision missing required fields");
                    ReviewDecision::malformed(e)
                }
            },
            Err(e) => match e.kind() {
                TourscribeErrorKind::Json(json) => {
                    warn!(error = %json.message, "Director reply was not valid JSON");
                    ReviewDecision::malformed(&json.message)
                }
                _ => return Err(generation_failure(state.waypoint().title(), e)),
            },
        };

        tracing::Span::current().record("approved", decision.is_ready());
        debug!(feedback = %decision.feedback(), "Review complete");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourscribe_core::{RouteLabel, WaypointSpec};

    fn state(prior: Vec<String>) -> RevisionState {
        let mut state = RevisionState::new(
            WaypointSpec::new("Radford", "River town.", "cover the New River."),
            RouteLabel::new("I-81 South"),
            prior,
        );
        state.apply_draft("Welcome to Radford.".to_string());
        state
    }

    #[test]
    fn test_prompt_without_history() {
        let prompt = ReviewGate::<()>::build_prompt(&state(Vec::new()), &TourConfig::default());
        assert!(prompt.starts_with("PREVIOUS SECTIONS (Context):\nNo previous sections.\n\n"));
        assert!(prompt.contains("CURRENT DRAFT TO REVIEW:\nWelcome to Radford.\n\n"));
        assert!(prompt.ends_with("Provide your decision in JSON."));
    }

    #[test]
    fn test_prompt_with_history() {
        let prior = vec!["STOP 1: A\nx".to_string(), "STOP 2: B\ny".to_string()];
        let prompt = ReviewGate::<()>::build_prompt(&state(prior), &TourConfig::default());
        assert!(prompt.contains("STOP 1: A\nx\n---\nSTOP 2: B\ny"));
        assert!(!prompt.contains(NO_PREVIOUS_SECTIONS));
    }

    #[test]
    fn test_request_is_json_and_cool() {
        let request = ReviewGate::<()>::request(&state(Vec::new()), &TourConfig::default()).unwrap();
        assert_eq!(*request.response_format(), ResponseFormat::Json);
        assert_eq!(*request.temperature(), Some(0.2));
        assert!(request.tools().is_empty());
    }

    #[test]
    fn test_decision_accepts_alias() {
        let decision: ReviewDecision =
            serde_json::from_str(r#"{"approved": true, "feedback": "Lovely."}"#).unwrap();
        assert_eq!(decision.into_parts(), (true, "Lovely.".to_string()));
    }

    #[test]
    fn test_decision_requires_feedback() {
        assert!(serde_json::from_str::<ReviewDecision>(r#"{"is_ready": true}"#).is_err());
    }
}
