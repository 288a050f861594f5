//! Tour pipeline error types.

/// Specific error conditions raised while producing a tour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TourErrorKind {
    /// The text-generation capability failed while drafting or reviewing a stop
    #[display("Generation failed for stop {}: {}", stop, message)]
    GenerationFailed {
        /// Title of the stop being processed
        stop: String,
        /// Underlying failure description
        message: String,
    },
    /// The writer returned no usable text
    #[display("Writer returned an empty draft for stop {}", stop)]
    EmptyDraft {
        /// Title of the stop being processed
        stop: String,
    },
    /// A generation call exceeded the configured timeout
    #[display("Generation call timed out after {} seconds", seconds)]
    Timeout {
        /// Configured timeout in seconds
        seconds: u64,
    },
    /// Run configuration is out of range
    #[display("Invalid tour configuration: {}", _0)]
    InvalidConfig(String),
    /// The document sink could not persist the tour
    #[display("Failed to write tour document: {}", _0)]
    SinkFailed(String),
    /// The agenda planner could not produce an agenda
    #[display("Agenda planning failed: {}", _0)]
    PlannerFailed(String),
}

/// Error type for tour operations.
///
/// # Examples
///
/// ```
/// use tourscribe_error::{TourError, TourErrorKind};
///
/// let err = TourError::new(TourErrorKind::EmptyDraft { stop: "Roanoke".to_string() });
/// assert!(format!("{}", err).contains("Roanoke"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Tour Error: {} at line {} in {}", kind, line, file)]
pub struct TourError {
    /// The specific error condition
    pub kind: TourErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TourError {
    /// Create a new TourError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TourErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
