//! Per-waypoint revision state and the draft/review transition function.

use tourscribe_core::{RouteLabel, WaypointSpec};

/// Working record for one waypoint's revision loop.
///
/// Created fresh per waypoint and discarded once the segment is emitted.
/// `revision_count` only grows and `approved` never reverts once set.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionState {
    waypoint: WaypointSpec,
    route: RouteLabel,
    prior_segments: Vec<String>,
    draft: String,
    feedback: Option<String>,
    revision_count: u32,
    approved: bool,
}

impl RevisionState {
    /// Initial state: no draft, no feedback, zero revisions.
    pub fn new(waypoint: WaypointSpec, route: RouteLabel, prior_segments: Vec<String>) -> Self {
        Self {
            waypoint,
            route,
            prior_segments,
            draft: String::new(),
            feedback: None,
            revision_count: 0,
            approved: false,
        }
    }

    /// Waypoint being narrated.
    pub fn waypoint(&self) -> &WaypointSpec {
        &self.waypoint
    }

    /// Route the tour follows.
    pub fn route(&self) -> &RouteLabel {
        &self.route
    }

    /// Tagged text of finished earlier segments, oldest first.
    pub fn prior_segments(&self) -> &[String] {
        &self.prior_segments
    }

    /// Latest draft, empty before the first round.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Latest director feedback, if any review has happened.
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Draft rounds completed.
    pub fn revision_count(&self) -> u32 {
        self.revision_count
    }

    /// Whether the director has approved a draft.
    pub fn approved(&self) -> bool {
        self.approved
    }

    /// Record a new draft and count the round.
    pub fn apply_draft(&mut self, draft: String) {
        self.draft = draft;
        self.revision_count += 1;
    }

    /// Record a review decision.
    pub fn apply_review(&mut self, is_ready: bool, feedback: String) {
        self.approved |= is_ready;
        self.feedback = Some(feedback);
    }

    /// Consume the state, yielding the final draft.
    pub fn into_draft(self) -> String {
        self.draft
    }
}

/// Position in the draft/review loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SessionPhase {
    /// The writer produces the next draft
    Drafting,
    /// The director reviews the latest draft
    Reviewing,
    /// The session is finished
    Done,
}

/// Next phase after `phase` completes.
///
/// After a review the loop ends once the cap is reached (checked first) or
/// the draft is approved; otherwise it goes back to drafting.
///
/// # Examples
///
/// ```
/// use tourscribe_core::{RouteLabel, WaypointSpec};
/// use tourscribe_narrative::{RevisionState, SessionPhase, transition};
///
/// let mut state = RevisionState::new(
///     WaypointSpec::new("Roanoke", "Railroad hub.", "rail history"),
///     RouteLabel::new("I-81 South"),
///     Vec::new(),
/// );
/// state.apply_draft("Draft one".to_string());
/// state.apply_review(false, "More trains.".to_string());
///
/// assert_eq!(transition(SessionPhase::Reviewing, &state, 3), SessionPhase::Drafting);
/// assert_eq!(transition(SessionPhase::Reviewing, &state, 1), SessionPhase::Done);
/// ```
pub fn transition(phase: SessionPhase, state: &RevisionState, max_revisions: u32) -> SessionPhase {
    match phase {
        SessionPhase::Drafting => SessionPhase::Reviewing,
        SessionPhase::Reviewing if state.revision_count >= max_revisions => SessionPhase::Done,
        SessionPhase::Reviewing if state.approved => SessionPhase::Done,
        SessionPhase::Reviewing => SessionPhase::Drafting,
        SessionPhase::Done => SessionPhase::Done,
    }
}
