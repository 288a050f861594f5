//! The assembled tour document.

use serde::{Deserialize, Serialize};

/// How a stop's session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentOutcome {
    /// The director approved the draft
    #[display("approved after {} revision(s)", revisions)]
    Approved {
        /// Draft rounds used
        revisions: u32,
    },
    /// The revision cap was reached without approval
    #[display("unapproved (capped) after {} revision(s)", revisions)]
    Capped {
        /// Draft rounds used
        revisions: u32,
        /// Last feedback from the director
        feedback: String,
    },
    /// Generation failed for this stop
    #[display("failed: {}", error)]
    Failed {
        /// Failure description
        error: String,
    },
}

/// One finalized stop in a tour.
///
/// # Examples
///
/// ```
/// use tourscribe_core::{SegmentOutcome, TourSegment};
///
/// let segment = TourSegment::new(
///     1,
///     "Blacksburg",
///     "Welcome to Blacksburg.",
///     SegmentOutcome::Approved { revisions: 1 },
/// );
/// assert_eq!(segment.tagged(), "STOP 1: Blacksburg\nWelcome to Blacksburg.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TourSegment {
    /// 1-based position in extraction order
    position: usize,
    /// Waypoint title
    title: String,
    /// Final narration, or a gap marker for failed stops
    text: String,
    /// How the session ended
    outcome: SegmentOutcome,
}

impl TourSegment {
    /// Create a segment.
    pub fn new(
        position: usize,
        title: impl Into<String>,
        text: impl Into<String>,
        outcome: SegmentOutcome,
    ) -> Self {
        Self {
            position,
            title: title.into(),
            text: text.into(),
            outcome,
        }
    }

    /// Create a gap-marker segment for a stop whose generation failed.
    pub fn failed(position: usize, title: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            position,
            title: title.into(),
            text: format!("[Segment unavailable: {}]", error),
            outcome: SegmentOutcome::Failed { error },
        }
    }

    /// Segment text tagged with its position and title, as fed to later stops.
    pub fn tagged(&self) -> String {
        format!("STOP {}: {}\n{}", self.position, self.title, self.text)
    }

    /// Whether the segment holds generated narration.
    pub fn is_narrated(&self) -> bool {
        !matches!(self.outcome, SegmentOutcome::Failed { .. })
    }
}

/// Ordered segments, one per extracted waypoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourDocument {
    segments: Vec<TourSegment>,
}

impl TourDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next segment.
    pub fn push(&mut self, segment: TourSegment) {
        self.segments.push(segment);
    }

    /// Segments in extraction order.
    pub fn segments(&self) -> &[TourSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the document has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Tagged text of every narrated segment, oldest first.
    ///
    /// Failed stops are left out so later stops never build on a gap marker.
    pub fn continuity(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter(|segment| segment.is_narrated())
            .map(TourSegment::tagged)
            .collect()
    }

    /// Segments the director approved.
    pub fn approved_count(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Approved { .. }))
    }

    /// Segments emitted at the revision cap without approval.
    pub fn capped_count(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Capped { .. }))
    }

    /// Segments that failed to generate.
    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&SegmentOutcome) -> bool) -> usize {
        self.segments
            .iter()
            .filter(|segment| predicate(segment.outcome()))
            .count()
    }
}

impl<'a> IntoIterator for &'a TourDocument {
    type Item = &'a TourSegment;
    type IntoIter = std::slice::Iter<'a, TourSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TourDocument {
        let mut doc = TourDocument::new();
        doc.push(TourSegment::new(
            1,
            "Blacksburg",
            "Frontier town.",
            SegmentOutcome::Approved { revisions: 1 },
        ));
        doc.push(TourSegment::failed(2, "Christiansburg", "quota exhausted"));
        doc.push(TourSegment::new(
            3,
            "Roanoke",
            "Rail hub.",
            SegmentOutcome::Capped {
                revisions: 3,
                feedback: "Mention the Star.".to_string(),
            },
        ));
        doc
    }

    #[test]
    fn test_counts() {
        let doc = sample();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.approved_count(), 1);
        assert_eq!(doc.failed_count(), 1);
        assert_eq!(doc.capped_count(), 1);
    }

    #[test]
    fn test_continuity_skips_failed() {
        let continuity = sample().continuity();
        assert_eq!(
            continuity,
            vec![
                "STOP 1: Blacksburg\nFrontier town.".to_string(),
                "STOP 3: Roanoke\nRail hub.".to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_segment_marker() {
        let segment = TourSegment::failed(2, "Christiansburg", "quota exhausted");
        assert_eq!(segment.text(), "[Segment unavailable: quota exhausted]");
        assert!(!segment.is_narrated());
        assert_eq!(segment.outcome().to_string(), "failed: quota exhausted");
    }
}
