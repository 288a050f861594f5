//! Errors raised while assembling generation requests.

/// Which part of a request failed to assemble.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A required request field was never set
    #[display("{} request is missing field '{}'", stage, field)]
    MissingField {
        /// Pipeline stage that built the request (writer, director, planner)
        stage: &'static str,
        /// Field left uninitialized
        field: String,
    },

    /// The request builder rejected its inputs
    #[display("{} request rejected: {}", stage, reason)]
    Rejected {
        /// Pipeline stage that built the request
        stage: &'static str,
        /// Builder's explanation
        reason: String,
    },
}

impl BuilderErrorKind {
    /// Stage whose request failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingField { stage, .. } | Self::Rejected { stage, .. } => stage,
        }
    }
}

/// Builder error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a new builder error with caller location tracking.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Classify a derive_builder failure for the request built by `stage`.
    ///
    /// derive_builder reports unset fields as "`name` must be initialized";
    /// those become [`BuilderErrorKind::MissingField`], anything else is
    /// [`BuilderErrorKind::Rejected`].
    #[track_caller]
    pub fn request(stage: &'static str, error: impl std::fmt::Display) -> Self {
        let reason = error.to_string();
        let kind = match reason
            .strip_prefix('`')
            .and_then(|rest| rest.strip_suffix("` must be initialized"))
        {
            Some(field) => BuilderErrorKind::MissingField {
                stage,
                field: field.to_string(),
            },
            None => BuilderErrorKind::Rejected { stage, reason },
        };
        Self::new(kind)
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_field_is_named() {
        let err = BuilderError::request("writer", "`messages` must be initialized");
        assert_eq!(
            err.kind(),
            &BuilderErrorKind::MissingField {
                stage: "writer",
                field: "messages".to_string()
            }
        );
        assert_eq!(
            err.kind().to_string(),
            "writer request is missing field 'messages'"
        );
    }

    #[test]
    fn test_other_failures_are_rejections() {
        let err = BuilderError::request("planner", "max_tokens out of range");
        assert_eq!(err.kind().stage(), "planner");
        assert!(matches!(err.kind(), BuilderErrorKind::Rejected { reason, .. } if reason == "max_tokens out of range"));
        assert!(err.to_string().starts_with("Builder Error: planner request rejected"));
    }
}
