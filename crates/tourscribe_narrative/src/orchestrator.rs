//! Drives one revision session per waypoint, in order, into a tour document.

use crate::{DraftGenerator, ReviewGate, RevisionSession, RevisionState, WaypointExtractor};
use tourscribe_core::{FailurePolicy, RouteLabel, TourConfig, TourDocument, TourSegment};
use tourscribe_error::{TourscribeError, TourscribeErrorKind, TourscribeResult};
use tourscribe_interface::{AgendaSource, DocumentSink, TourDriver};
use tracing::{info, instrument, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RunStatus {
    /// Every waypoint was processed
    Completed,
    /// The agenda was absent or held no waypoints
    NothingToGenerate,
}

/// Result of one orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct TourRun {
    /// How the run ended
    status: RunStatus,
    /// Route label, absent only when there was no agenda text
    route: Option<RouteLabel>,
    /// Segments in extraction order
    document: TourDocument,
}

impl TourRun {
    /// Whether any segment was produced.
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Consume the run, yielding the document.
    pub fn into_document(self) -> TourDocument {
        self.document
    }
}

/// Sequential tour generation over a single driver.
///
/// Waypoint *i+1* starts only after waypoint *i* is final, and sees the
/// narrated text of every earlier stop as continuity context.
///
/// # Examples
///
/// ```no_run
/// use tourscribe_core::TourConfig;
/// use tourscribe_interface::TourDriver;
/// use tourscribe_narrative::TourOrchestrator;
///
/// # async fn demo<D: TourDriver>(driver: D) -> tourscribe_error::TourscribeResult<()> {
/// let orchestrator = TourOrchestrator::new(driver, TourConfig::default())?;
/// let run = orchestrator.run(Some("Primary Route: I-81\n1. **Salem**\nSummary: x")).await?;
/// println!("{} stops", run.document().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TourOrchestrator<D> {
    driver: D,
    config: TourConfig,
    extractor: WaypointExtractor,
}

impl<D: TourDriver> TourOrchestrator<D> {
    /// Create an orchestrator with the default extractor.
    ///
    /// # Errors
    ///
    /// Returns [`TourErrorKind::InvalidConfig`](tourscribe_error::TourErrorKind::InvalidConfig)
    /// if `config` fails validation.
    pub fn new(driver: D, config: TourConfig) -> TourscribeResult<Self> {
        config.validate()?;
        Ok(Self {
            driver,
            config,
            extractor: WaypointExtractor::new()?,
        })
    }

    /// Replace the waypoint extractor.
    pub fn with_extractor(mut self, extractor: WaypointExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Run settings.
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// Generate a tour from agenda text.
    ///
    /// Absent text or an agenda without waypoints yields
    /// [`RunStatus::NothingToGenerate`] and an empty document.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Strict`], the first stop that fails aborts the
    /// run. Under [`FailurePolicy::Lenient`] failures become gap segments and
    /// this only fails on internal setup errors.
    #[instrument(
        name = "tour",
        skip_all,
        fields(
            model = %self.config.generation_model_id(),
            route = tracing::field::Empty,
            waypoints = tracing::field::Empty,
        )
    )]
    pub async fn run(&self, raw_text: Option<&str>) -> TourscribeResult<TourRun> {
        let (waypoints, route) = self.extractor.extract(raw_text);
        let span = tracing::Span::current();
        span.record("waypoints", waypoints.len());

        if waypoints.is_empty() {
            info!("Nothing to generate");
            return Ok(TourRun {
                status: RunStatus::NothingToGenerate,
                route,
                document: TourDocument::new(),
            });
        }

        let route = route.unwrap_or_else(RouteLabel::not_found);
        span.record("route", route.as_str());
        info!(stops = waypoints.len(), "Starting tour generation");

        let writer = DraftGenerator::new(&self.driver);
        let director = ReviewGate::new(&self.driver);
        let session = RevisionSession::new(&writer, &director, &self.config);
        let mut document = TourDocument::new();

        for (index, waypoint) in waypoints.into_iter().enumerate() {
            let position = index + 1;
            let title = waypoint.title().clone();
            info!(stop = position, title = %title, "Processing stop");

            let state = RevisionState::new(waypoint, route.clone(), document.continuity());
            match session.run(state).await {
                Ok(outcome) => {
                    let segment = outcome.into_segment(position, title);
                    info!(stop = position, outcome = %segment.outcome(), "Finished stop");
                    document.push(segment);
                }
                Err(e) => match self.config.failure_policy() {
                    FailurePolicy::Strict => return Err(e),
                    FailurePolicy::Lenient => {
                        let reason = failure_reason(&e);
                        warn!(stop = position, title = %title, error = %reason, "Skipping failed stop");
                        document.push(TourSegment::failed(position, title, reason));
                    }
                },
            }
        }

        info!(
            approved = document.approved_count(),
            capped = document.capped_count(),
            failed = document.failed_count(),
            "Tour generation complete"
        );

        Ok(TourRun {
            status: RunStatus::Completed,
            route: Some(route),
            document,
        })
    }

    /// Generate a tour and hand it to `sink` when at least one stop exists.
    ///
    /// # Errors
    ///
    /// Returns generation errors as [`run`](Self::run) does, and sink errors.
    pub async fn run_and_render(
        &self,
        raw_text: Option<&str>,
        sink: &dyn DocumentSink,
    ) -> TourscribeResult<TourRun> {
        let run = self.run(raw_text).await?;
        if let (RunStatus::Completed, Some(route)) = (run.status, run.route.as_ref()) {
            sink.write(route, &run.document).await?;
        }
        Ok(run)
    }

    /// Pull the agenda from `source`, then generate as [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns the source's error, or generation errors.
    pub async fn run_source(&self, source: &dyn AgendaSource) -> TourscribeResult<TourRun> {
        let agenda = source.agenda().await?;
        self.run(agenda.as_deref()).await
    }
}

/// Short failure description for a gap marker.
fn failure_reason(err: &TourscribeError) -> String {
    match err.kind() {
        TourscribeErrorKind::Tour(tour) => tour.kind.to_string(),
        other => other.to_string(),
    }
}
