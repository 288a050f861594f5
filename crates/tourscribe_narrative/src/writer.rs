//! The writer: turns a waypoint and its revision state into a narrated draft.

use crate::{RevisionState, continuity_window, deadline};
use tourscribe_core::{GenerateRequest, Message, Tool, TourConfig};
use tourscribe_error::{BuilderError, TourError, TourErrorKind, TourscribeErrorKind, TourscribeResult};
use tourscribe_interface::TourDriver;
use tracing::{debug, instrument};

/// Persona instruction for the script writer.
pub const WRITER_PERSONA: &str = r#"ROLE: You are an award-winning Audio Tour Script Writer and Local Historian. Your goal is to turn dry facts into "theatre for the ears."

TONE:
- Engaging, warm, and slightly witty.
- Think "National Geographic meets a friendly local pub guide."
- Use "Verbal Signposting" (e.g., "If you look to your left," "Now, notice the brickwork...").

CONTENT GUIDELINES:
1. SENSORY DETAILS: Don't just tell history; describe the smell of the coal smoke, the sound of the frontier wagons, or the vibe of a modern college game day.
2. THE "HUMOR QUOTA": Include 1-2 subtle, tasteful jokes or "fun facts" per segment.
3. RESEARCH INTEGRITY: Use your search tool to find specific, non-obvious details (names of founding families, specific dates, or quirky local legends).
4. PACING: Write for the ear. Use shorter sentences. Avoid complex jargon unless you explain it immediately.
5. TRANSITIONS: Always end the segment by hinting at the next destination to keep the listener moving.

STRUCTURE:
- Intro: Hook the listener immediately.
- The "Meat": Deep dive into the history/directive.
- The "Easter Egg": One weird/funny fact nobody knows.
- Outro: A smooth transition statement."#;

/// Separator between prior segments in prompts.
pub(crate) const SEGMENT_SEPARATOR: &str = "\n---\n";

/// Produces drafts for one waypoint at a time.
///
/// Stateless apart from the driver handle; the caller applies the returned
/// draft to the [`RevisionState`].
#[derive(Debug, Clone)]
pub struct DraftGenerator<D> {
    driver: D,
}

impl<D> DraftGenerator<D> {
    /// Create a writer over a driver handle.
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Writer prompt for the given state.
    ///
    /// Always carries the route and the waypoint fields. Feedback plus the
    /// previous draft are added on revision rounds, and prior segments when
    /// earlier stops exist.
    pub fn build_prompt(state: &RevisionState, config: &TourConfig) -> String {
        let waypoint = state.waypoint();
        let mut prompt = format!(
            "GENERATE TOUR SEGMENT:\nRoute Name: {}\nPoint Title: {}\nSummary: {}\nSpecific Directive: {}",
            state.route(),
            waypoint.title(),
            waypoint.summary(),
            waypoint.directive()
        );

        if let Some(feedback) = state.feedback().filter(|f| !f.is_empty()) {
            prompt.push_str("\n\n*** CRITICAL FEEDBACK FROM DIRECTOR ***\n");
            prompt.push_str(feedback);
            prompt.push_str("\n\nPREVIOUS DRAFT (For Reference):\n");
            prompt.push_str(state.draft());
        }

        let history = continuity_window(state.prior_segments(), *config.max_context_chars());
        if !history.is_empty() {
            prompt.push_str("\n\nCONTEXT (Previously written stops):\n");
            prompt.push_str(&history.join(SEGMENT_SEPARATOR));
        }

        prompt
    }

    /// Full generation request for the given state.
    pub fn request(state: &RevisionState, config: &TourConfig) -> TourscribeResult<GenerateRequest> {
        let tools = if *config.writer_web_search() {
            vec![Tool::WebSearch]
        } else {
            Vec::new()
        };

        GenerateRequest::builder()
            .messages(vec![Message::user(Self::build_prompt(state, config))])
            .system_instruction(WRITER_PERSONA)
            .tools(tools)
            .temperature(*config.writer_temperature())
            .model(config.generation_model_id().clone())
            .build()
            .map_err(|e| BuilderError::request("writer", e).into())
    }
}

impl<D: TourDriver> DraftGenerator<D> {
    /// Produce the next draft.
    ///
    /// # Errors
    ///
    /// - [`TourErrorKind::GenerationFailed`] when the driver fails
    /// - [`TourErrorKind::EmptyDraft`] when the reply has no text
    /// - [`TourErrorKind::Timeout`] when the configured deadline expires
    #[instrument(
        name = "writer",
        skip_all,
        fields(
            title = %state.waypoint().title(),
            revision = state.revision_count() + 1,
            prompt_chars = tracing::field::Empty,
        )
    )]
    pub async fn generate(&self, state: &RevisionState, config: &TourConfig) -> TourscribeResult<String> {
        let request = Self::request(state, config)?;
        tracing::Span::current().record("prompt_chars", request.prompt_chars());

        let title = state.waypoint().title();
        let response = deadline::within(*config.request_timeout(), self.driver.generate(&request))
            .await
            .map_err(|e| generation_failure(title, e))?;

        let draft = response
            .text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                TourError::new(TourErrorKind::EmptyDraft {
                    stop: title.clone(),
                })
            })?;

        debug!(chars = draft.len(), "Draft generated");
        Ok(draft)
    }
}

/// Wrap a driver failure as a generation failure for `stop`.
///
/// Errors already expressed in tour terms (timeouts) pass through unchanged.
pub(crate) fn generation_failure(
    stop: &str,
    err: tourscribe_error::TourscribeError,
) -> tourscribe_error::TourscribeError {
    if matches!(err.kind(), TourscribeErrorKind::Tour(_)) {
        return err;
    }
    TourError::new(TourErrorKind::GenerationFailed {
        stop: stop.to_string(),
        message: err.to_string(),
    })
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourscribe_core::{ResponseFormat, RouteLabel, WaypointSpec};

    fn state(prior: Vec<String>) -> RevisionState {
        RevisionState::new(
            WaypointSpec::new("Roanoke", "Railroad hub.", "cover rail history."),
            RouteLabel::new("I-81 South"),
            prior,
        )
    }

    #[test]
    fn test_first_round_prompt() {
        let prompt = DraftGenerator::<()>::build_prompt(&state(Vec::new()), &TourConfig::default());
        assert_eq!(
            prompt,
            "GENERATE TOUR SEGMENT:\nRoute Name: I-81 South\nPoint Title: Roanoke\nSummary: Railroad hub.\nSpecific Directive: cover rail history."
        );
    }

    #[test]
    fn test_revision_branch() {
        let mut state = state(Vec::new());
        state.apply_draft("Old draft".to_string());
        state.apply_review(false, "Mention the Virginian Railway.".to_string());

        let prompt = DraftGenerator::<()>::build_prompt(&state, &TourConfig::default());
        assert!(prompt.contains("*** CRITICAL FEEDBACK FROM DIRECTOR ***\nMention the Virginian Railway."));
        assert!(prompt.contains("PREVIOUS DRAFT (For Reference):\nOld draft"));
        assert!(!prompt.contains("CONTEXT (Previously written stops)"));
    }

    #[test]
    fn test_continuity_branch() {
        let prior = vec![
            "STOP 1: Blacksburg\nHello.".to_string(),
            "STOP 2: Christiansburg\nOnward.".to_string(),
        ];
        let prompt = DraftGenerator::<()>::build_prompt(&state(prior), &TourConfig::default());
        assert!(prompt.ends_with(
            "CONTEXT (Previously written stops):\nSTOP 1: Blacksburg\nHello.\n---\nSTOP 2: Christiansburg\nOnward."
        ));
        assert!(!prompt.contains("CRITICAL FEEDBACK"));
    }

    #[test]
    fn test_context_cap_applied() {
        let prior = vec!["a".repeat(50), "b".repeat(10)];
        let config = TourConfig::builder().max_context_chars(20).build().unwrap();
        let prompt = DraftGenerator::<()>::build_prompt(&state(prior), &config);
        assert!(prompt.contains(&"b".repeat(10)));
        assert!(!prompt.contains(&"a".repeat(50)));
    }

    #[test]
    fn test_request_settings() {
        let config = TourConfig::builder().writer_temperature(0.9).build().unwrap();
        let request = DraftGenerator::<()>::request(&state(Vec::new()), &config).unwrap();
        assert_eq!(*request.temperature(), Some(0.9));
        assert_eq!(request.tools(), &vec![Tool::WebSearch]);
        assert_eq!(*request.response_format(), ResponseFormat::Text);
        assert_eq!(request.system_instruction().as_deref(), Some(WRITER_PERSONA));
        assert_eq!(request.model().as_deref(), Some("gemini-2.5-flash"));

        let quiet = TourConfig::builder().writer_web_search(false).build().unwrap();
        let request = DraftGenerator::<()>::request(&state(Vec::new()), &quiet).unwrap();
        assert!(request.tools().is_empty());
    }
}
