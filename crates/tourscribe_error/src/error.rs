//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, GeminiError, HttpError, JsonError, RateLimitError, TourError,
};

/// Every error condition a tourscribe operation can report.
///
/// # Examples
///
/// ```
/// use tourscribe_error::{TourscribeError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: TourscribeError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TourscribeErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Gemini provider error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Rate limiter error
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
    /// Tour pipeline error
    #[from(TourError)]
    Tour(TourError),
}

/// Tourscribe error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tourscribe_error::{TourscribeResult, ConfigError};
///
/// fn might_fail() -> TourscribeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tourscribe Error: {}", _0)]
pub struct TourscribeError(Box<TourscribeErrorKind>);

impl TourscribeError {
    /// Create a new error from a kind.
    pub fn new(kind: TourscribeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TourscribeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to TourscribeErrorKind
impl<T> From<T> for TourscribeError
where
    T: Into<TourscribeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for tourscribe operations.
pub type TourscribeResult<T> = std::result::Result<T, TourscribeError>;
