//! The per-waypoint draft/review loop.

use crate::{DraftGenerator, ReviewGate, RevisionState, SessionPhase, transition};
use tourscribe_core::{SegmentOutcome, TourConfig, TourSegment};
use tourscribe_error::TourscribeResult;
use tourscribe_interface::TourDriver;
use tracing::{debug, info, instrument, warn};

/// Result of driving one waypoint to completion.
///
/// `draft` is never empty: the writer rejects blank replies before a round
/// is counted.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SessionOutcome {
    /// Final draft, approved or not
    draft: String,
    /// Draft rounds used
    revisions: u32,
    /// Whether the director approved the final draft
    approved: bool,
    /// Last director feedback
    feedback: Option<String>,
}

impl SessionOutcome {
    fn from_state(state: RevisionState) -> Self {
        let revisions = state.revision_count();
        let approved = state.approved();
        let feedback = state.feedback().map(str::to_string);
        Self {
            draft: state.into_draft(),
            revisions,
            approved,
            feedback,
        }
    }

    /// Turn the outcome into the document segment at `position`.
    pub fn into_segment(self, position: usize, title: impl Into<String>) -> TourSegment {
        let outcome = if self.approved {
            SegmentOutcome::Approved {
                revisions: self.revisions,
            }
        } else {
            SegmentOutcome::Capped {
                revisions: self.revisions,
                feedback: self.feedback.unwrap_or_default(),
            }
        };
        TourSegment::new(position, title, self.draft, outcome)
    }
}

/// Alternates drafting and reviewing for one waypoint.
///
/// At most `max_revisions` draft/review rounds run. A capped draft is still
/// returned.
#[derive(Debug)]
pub struct RevisionSession<'a, D> {
    writer: &'a DraftGenerator<D>,
    director: &'a ReviewGate<D>,
    config: &'a TourConfig,
}

impl<'a, D: TourDriver> RevisionSession<'a, D> {
    /// Create a session over shared writer and director handles.
    pub fn new(
        writer: &'a DraftGenerator<D>,
        director: &'a ReviewGate<D>,
        config: &'a TourConfig,
    ) -> Self {
        Self {
            writer,
            director,
            config,
        }
    }

    /// Run the loop from `state` until approval or the revision cap.
    ///
    /// # Errors
    ///
    /// Propagates the first writer or director failure.
    #[instrument(
        name = "session",
        skip_all,
        fields(title = %state.waypoint().title(), max_revisions = *self.config.max_revisions())
    )]
    pub async fn run(&self, mut state: RevisionState) -> TourscribeResult<SessionOutcome> {
        let max_revisions = *self.config.max_revisions();
        let mut phase = SessionPhase::Drafting;

        loop {
            match phase {
                SessionPhase::Drafting => {
                    let draft = self.writer.generate(&state, self.config).await?;
                    state.apply_draft(draft);
                }
                SessionPhase::Reviewing => {
                    let (is_ready, feedback) =
                        self.director.review(&state, self.config).await?.into_parts();
                    info!(
                        revision = state.revision_count(),
                        approved = is_ready,
                        "Director reviewed draft"
                    );
                    state.apply_review(is_ready, feedback);
                }
                SessionPhase::Done => break,
            }
            let next = transition(phase, &state, max_revisions);
            debug!(from = %phase, to = %next, "Session transition");
            phase = next;
        }

        if !state.approved() {
            warn!(
                revisions = state.revision_count(),
                feedback = state.feedback().unwrap_or_default(),
                "Revision cap reached without approval, keeping last draft"
            );
        }

        Ok(SessionOutcome::from_state(state))
    }
}
