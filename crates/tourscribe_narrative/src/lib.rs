//! Agenda extraction and the writer/director revision loop.
//!
//! The pipeline, leaf first:
//!
//! - [`WaypointExtractor`] recovers a route label and ordered waypoints from
//!   free-form agenda text. It never fails on content; missing pieces become
//!   sentinels.
//! - [`DraftGenerator`] (the writer) and [`ReviewGate`] (the director) each
//!   make one call to a [`TourDriver`](tourscribe_interface::TourDriver).
//! - [`RevisionSession`] alternates drafting and reviewing for one waypoint
//!   until approval or the revision cap.
//! - [`TourOrchestrator`] runs one session per waypoint, in order, feeding
//!   finished segments forward as continuity context, then hands the
//!   [`TourDocument`](tourscribe_core::TourDocument) to a sink.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod deadline;
mod director;
mod extraction;
mod orchestrator;
mod planner;
mod session;
mod sink;
mod state;
mod writer;

pub use context::continuity_window;
pub use director::{DIRECTOR_PERSONA, ReviewDecision, ReviewGate};
pub use extraction::{Field, FieldExtractor, RegexFieldExtractor, WaypointExtractor};
pub use orchestrator::{RunStatus, TourOrchestrator, TourRun};
pub use planner::{AgendaPlanner, PLANNER_PERSONA, PlannerSettings, StaticAgenda, trip_request};
pub use session::{RevisionSession, SessionOutcome};
pub use sink::{InMemorySink, MarkdownSink, TranscriptDirSink, render_markdown, transcript_file_name};
pub use state::{RevisionState, SessionPhase, transition};
pub use writer::{DraftGenerator, WRITER_PERSONA};
