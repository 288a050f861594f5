//! Agenda sources: a model-backed route planner and fixed text.

use async_trait::async_trait;
use tourscribe_core::{GenerateRequest, Message, Tool};
use tourscribe_error::{
    BuilderError, GeminiErrorKind, TourError, TourErrorKind, TourscribeErrorKind, TourscribeResult,
};
use tourscribe_interface::{AgendaSource, TourDriver};
use tracing::{info, instrument, warn};

/// Persona instruction for the route planner.
pub const PLANNER_PERSONA: &str = r#"You are the "Route Narrative Architect." Your sole purpose is to generate a high-level "Audio Tour Agenda" for a specific driving route.

When a user provides a start and end point:
1. Use the Google Maps tool to identify the primary route (e.g., US-101, I-280, PCH) and the neighborhoods it passes through. State it on its own line as "Primary Route: <route>".
2. Identify 5-8 "Narrative Markers" along this path. These markers must be a mix of:
   - Historical Milestones (e.g., Missionaries, Ohlone history).
   - Local Lore & Cultural Trivia (e.g., "The Ghost of Highway 17").
   - Economic/Industry Facts (e.g., Sand Hill Road venture capital, Garage startups).
   - Natural Wonders (e.g., Fault lines, specific mountain ranges, unique flora).
   - Current highly-rated "Pit Stops" (Unique cafes or viewpoints).
   - Famous and historical stores, cafes, restaurants, etc.

OUTPUT FORMAT:
Provide a numbered list of "Agenda Headings", each starting with the marker name in bold (e.g., "1. **Marker Name**"). Each heading should include:
- "Summary:" a concise summary of the specific fact, lore, or event to be covered.
- "Script Writer Directive:" a one-sentence instruction for the next agent on what specific angle to research/write about.

STRICT RULES:
- Do not write full paragraphs.
- Keep descriptions to "Headlines" only.
- Ensure the markers are geographically sequential based on the route.
- Focus on "Hidden in plain sight" details that a driver might see through their window.

Additionally, if the user has any specific requests, incorporate them into the agenda."#;

/// Planner model settings.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PlannerSettings {
    /// Model used for planning
    model: String,
    /// Output token cap
    max_output_tokens: u32,
    /// Whether the planner may use the maps tool
    use_maps: bool,
}

impl PlannerSettings {
    /// Default planner model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash-exp";
    /// Default output token cap.
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

    /// Create planner settings.
    pub fn new(model: impl Into<String>, max_output_tokens: u32, use_maps: bool) -> Self {
        Self {
            model: model.into(),
            max_output_tokens,
            use_maps,
        }
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MODEL, Self::DEFAULT_MAX_OUTPUT_TOKENS, true)
    }
}

/// Trip description handed to the planner.
///
/// # Examples
///
/// ```
/// use tourscribe_narrative::trip_request;
///
/// assert_eq!(
///     trip_request("Blacksburg, Virginia", "Roanoke, Virginia", None),
///     "I am travelling from Blacksburg, Virginia to Roanoke, Virginia."
/// );
/// assert!(trip_request("A", "B", Some("Include a diner")).ends_with("Specific requests: Include a diner"));
/// ```
pub fn trip_request(from: &str, to: &str, requests: Option<&str>) -> String {
    let mut prompt = format!("I am travelling from {} to {}.", from.trim(), to.trim());
    if let Some(requests) = requests.map(str::trim).filter(|r| !r.is_empty()) {
        prompt.push_str("\nSpecific requests: ");
        prompt.push_str(requests);
    }
    prompt
}

/// Produces agenda text for a trip with the route-planner persona.
#[derive(Debug, Clone)]
pub struct AgendaPlanner<D> {
    driver: D,
    settings: PlannerSettings,
    trip: String,
}

impl<D> AgendaPlanner<D> {
    /// Planner for the given trip description.
    pub fn new(driver: D, settings: PlannerSettings, trip: impl Into<String>) -> Self {
        Self {
            driver,
            settings,
            trip: trip.into(),
        }
    }

    /// Planner settings.
    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Generation request for the trip.
    pub fn request(&self) -> TourscribeResult<GenerateRequest> {
        let tools = if self.settings.use_maps {
            vec![Tool::Maps]
        } else {
            Vec::new()
        };

        GenerateRequest::builder()
            .messages(vec![Message::user(self.trip.clone())])
            .system_instruction(PLANNER_PERSONA)
            .tools(tools)
            .max_tokens(self.settings.max_output_tokens)
            .model(self.settings.model.clone())
            .build()
            .map_err(|e| BuilderError::request("planner", e).into())
    }
}

#[async_trait]
impl<D: TourDriver> AgendaSource for AgendaPlanner<D> {
    /// A reply with no text (empty or safety-blocked) is `Ok(None)`.
    #[instrument(name = "planner", skip_all, fields(model = %self.settings.model))]
    async fn agenda(&self) -> TourscribeResult<Option<String>> {
        let request = self.request()?;

        match self.driver.generate(&request).await {
            Ok(response) => {
                let agenda = response.text();
                match &agenda {
                    Some(text) => info!(chars = text.len(), "Agenda planned"),
                    None => warn!(finish_reason = ?response.finish_reason(), "Planner returned no text"),
                }
                Ok(agenda)
            }
            Err(e) => match e.kind() {
                TourscribeErrorKind::Gemini(gemini)
                    if matches!(
                        gemini.kind,
                        GeminiErrorKind::EmptyResponse | GeminiErrorKind::SafetyBlocked(_)
                    ) =>
                {
                    warn!(error = %gemini.kind, "Planner returned no text");
                    Ok(None)
                }
                _ => Err(TourError::new(TourErrorKind::PlannerFailed(e.to_string())).into()),
            },
        }
    }
}

/// Agenda supplied up front, e.g. read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAgenda(Option<String>);

impl StaticAgenda {
    /// Agenda over fixed text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(Some(text.into()))
    }

    /// Source that yields no agenda.
    pub fn empty() -> Self {
        Self(None)
    }
}

#[async_trait]
impl AgendaSource for StaticAgenda {
    async fn agenda(&self) -> TourscribeResult<Option<String>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_request_ignores_blank_requests() {
        assert_eq!(
            trip_request(" A ", "B", Some("   ")),
            "I am travelling from A to B."
        );
    }

    #[test]
    fn test_request_uses_settings() {
        let planner = AgendaPlanner::new((), PlannerSettings::default(), "I am travelling from A to B.");
        let request = planner.request().unwrap();
        assert_eq!(request.tools(), &vec![Tool::Maps]);
        assert_eq!(*request.max_tokens(), Some(8192));
        assert_eq!(request.model().as_deref(), Some("gemini-2.0-flash-exp"));
        assert_eq!(request.system_instruction().as_deref(), Some(PLANNER_PERSONA));

        let planner = AgendaPlanner::new((), PlannerSettings::new("m", 100, false), "trip");
        assert!(planner.request().unwrap().tools().is_empty());
    }

    #[tokio::test]
    async fn test_static_agenda() {
        assert_eq!(
            StaticAgenda::new("agenda").agenda().await.unwrap().as_deref(),
            Some("agenda")
        );
        assert!(StaticAgenda::empty().agenda().await.unwrap().is_none());
    }
}
