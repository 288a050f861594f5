//! Recovery of a route label and waypoints from agenda text.
//!
//! Extraction is total: every input yields a result. Absent fields become
//! [`NOT_FOUND`], an absent route becomes the [`RouteLabel::not_found`]
//! sentinel, and blocks without a `Summary:` label are dropped as preamble.

use regex::Regex;
use tourscribe_core::{NOT_FOUND, RouteLabel, WaypointSpec};
use tourscribe_error::{TourError, TourErrorKind, TourscribeResult};
use tracing::{debug, instrument};

/// Marker every retained waypoint block must contain.
const SUMMARY_MARKER: &str = "Summary:";

/// A labeled field recoverable from agenda text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Route announcement, searched in the whole agenda
    Route,
    /// First emphasized span of a block
    Title,
    /// Text after `Summary:`
    Summary,
    /// Text after `Script Writer Directive:`
    Directive,
}

/// Pattern-matching capability used by [`WaypointExtractor`].
///
/// Returning `None` means "marker absent"; the extractor substitutes the
/// sentinel. Swap this out to consume a stricter upstream format without
/// touching the revision loop.
pub trait FieldExtractor: Send + Sync {
    /// Recover `field` from `text`.
    fn extract_field(&self, field: Field, text: &str) -> Option<String>;

    /// Split agenda text into candidate waypoint blocks, in source order.
    fn split_blocks<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Regex-based field recovery for markdown-ish planner output.
///
/// # Examples
///
/// ```
/// use tourscribe_narrative::{Field, FieldExtractor, RegexFieldExtractor};
///
/// let fields = RegexFieldExtractor::new().unwrap();
/// let block = "1. **Roanoke**\nSummary: Railroad hub.";
/// assert_eq!(fields.extract_field(Field::Title, block).as_deref(), Some("Roanoke"));
/// assert_eq!(fields.extract_field(Field::Directive, block), None);
/// ```
#[derive(Debug, Clone)]
pub struct RegexFieldExtractor {
    route: Regex,
    boundary: Regex,
    title: Regex,
    summary: Regex,
    directive: Regex,
}

impl RegexFieldExtractor {
    /// Route announcement: case-insensitive, remainder of the line.
    pub const ROUTE_PATTERN: &'static str = r"(?im)primary route:[ \t]*(.*)$";
    /// A numbered, emphasized heading at the start of a line.
    pub const BOUNDARY_PATTERN: &'static str = r"\n\d+\.\s+\*\*";
    /// First emphasized span.
    pub const TITLE_PATTERN: &'static str = r"\*\*(.*?)\*\*";
    /// Summary label to line end.
    pub const SUMMARY_PATTERN: &'static str = r"Summary:[ \t]*(.*)";
    /// Directive label to line end.
    pub const DIRECTIVE_PATTERN: &'static str = r"Script Writer Directive:[ \t]*(.*)";

    /// Compile the default patterns.
    ///
    /// # Errors
    ///
    /// Returns [`TourErrorKind::InvalidConfig`] if a pattern fails to compile.
    pub fn new() -> TourscribeResult<Self> {
        Self::with_patterns(
            Self::ROUTE_PATTERN,
            Self::BOUNDARY_PATTERN,
            Self::TITLE_PATTERN,
            Self::SUMMARY_PATTERN,
            Self::DIRECTIVE_PATTERN,
        )
    }

    /// Compile custom patterns. Each field pattern must have one capture group.
    ///
    /// # Errors
    ///
    /// Returns [`TourErrorKind::InvalidConfig`] naming the pattern that failed.
    pub fn with_patterns(
        route: &str,
        boundary: &str,
        title: &str,
        summary: &str,
        directive: &str,
    ) -> TourscribeResult<Self> {
        Ok(Self {
            route: compile("route", route)?,
            boundary: compile("boundary", boundary)?,
            title: compile("title", title)?,
            summary: compile("summary", summary)?,
            directive: compile("directive", directive)?,
        })
    }
}

fn compile(name: &str, pattern: &str) -> TourscribeResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        TourError::new(TourErrorKind::InvalidConfig(format!(
            "invalid {} pattern: {}",
            name, e
        )))
        .into()
    })
}

impl FieldExtractor for RegexFieldExtractor {
    fn extract_field(&self, field: Field, text: &str) -> Option<String> {
        let pattern = match field {
            Field::Route => &self.route,
            Field::Title => &self.title,
            Field::Summary => &self.summary,
            Field::Directive => &self.directive,
        };
        let value = pattern.captures(text)?.get(1)?.as_str();

        let value = match field {
            // Keep inner asterisks in route names; shed emphasis wrapping
            Field::Route => value
                .trim_matches(|c: char| c == '*' || c.is_whitespace())
                .to_string(),
            _ => value.replace('*', "").trim().to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    fn split_blocks<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut blocks = Vec::new();
        let mut start = 0;
        for boundary in self.boundary.find_iter(text) {
            blocks.push(&text[start..boundary.start()]);
            // Drop the newline, keep the heading
            start = boundary.start() + 1;
        }
        blocks.push(&text[start..]);
        blocks
    }
}

/// Parses agenda text into `(waypoints, route)`.
///
/// # Examples
///
/// ```
/// use tourscribe_narrative::WaypointExtractor;
///
/// let agenda = "Primary Route: I-81 South\n\
///     1. **Blacksburg**\n\
///     Summary: Founded as a frontier town.\n\
///     Script Writer Directive: cover founding families.\n\
///     2. **Roanoke**\n\
///     Summary: Railroad hub.\n\
///     Script Writer Directive: cover rail history.";
///
/// let extractor = WaypointExtractor::new().unwrap();
/// let (waypoints, route) = extractor.extract(Some(agenda));
///
/// assert_eq!(route.unwrap().as_str(), "I-81 South");
/// assert_eq!(waypoints.len(), 2);
/// assert_eq!(waypoints[1].title(), "Roanoke");
/// assert_eq!(waypoints[1].directive(), "cover rail history.");
/// ```
pub struct WaypointExtractor {
    fields: Box<dyn FieldExtractor>,
}

impl std::fmt::Debug for WaypointExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointExtractor").finish_non_exhaustive()
    }
}

impl WaypointExtractor {
    /// Extractor using [`RegexFieldExtractor`] defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the default patterns fail to compile.
    pub fn new() -> TourscribeResult<Self> {
        Ok(Self::with_fields(RegexFieldExtractor::new()?))
    }

    /// Extractor over a custom field capability.
    pub fn with_fields(fields: impl FieldExtractor + 'static) -> Self {
        Self {
            fields: Box::new(fields),
        }
    }

    /// Extract waypoints and the route label.
    ///
    /// `None` input yields `(vec![], None)`. Any text yields `Some(route)`,
    /// which is the sentinel label when no route is announced.
    #[instrument(skip(self, raw_text), fields(chars = raw_text.map(str::len)))]
    pub fn extract(&self, raw_text: Option<&str>) -> (Vec<WaypointSpec>, Option<RouteLabel>) {
        let Some(text) = raw_text else {
            debug!("No agenda text to extract from");
            return (Vec::new(), None);
        };

        let route = self
            .fields
            .extract_field(Field::Route, text)
            .filter(|route| !route.is_empty())
            .map(RouteLabel::new)
            .unwrap_or_else(RouteLabel::not_found);

        let blocks = self.fields.split_blocks(text);
        let total = blocks.len();
        let waypoints: Vec<WaypointSpec> = blocks
            .into_iter()
            .filter(|block| block.contains(SUMMARY_MARKER))
            .map(|block| {
                WaypointSpec::new(
                    self.field_or_sentinel(Field::Title, block),
                    self.field_or_sentinel(Field::Summary, block),
                    self.field_or_sentinel(Field::Directive, block),
                )
            })
            .collect();

        debug!(
            route = %route,
            blocks = total,
            waypoints = waypoints.len(),
            "Extracted agenda"
        );

        (waypoints, Some(route))
    }

    fn field_or_sentinel(&self, field: Field, block: &str) -> String {
        self.fields
            .extract_field(field, block)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| NOT_FOUND.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENDA: &str = "Primary Route: I-81 South\n1. **Blacksburg**\nSummary: Founded as a frontier town.\nScript Writer Directive: cover founding families.\n2. **Roanoke**\nSummary: Railroad hub.\nScript Writer Directive: cover rail history.";

    fn extractor() -> WaypointExtractor {
        WaypointExtractor::new().unwrap()
    }

    #[test]
    fn test_reference_agenda() {
        let (waypoints, route) = extractor().extract(Some(AGENDA));

        assert_eq!(route, Some(RouteLabel::new("I-81 South")));
        assert_eq!(
            waypoints,
            vec![
                WaypointSpec::new(
                    "Blacksburg",
                    "Founded as a frontier town.",
                    "cover founding families."
                ),
                WaypointSpec::new("Roanoke", "Railroad hub.", "cover rail history."),
            ]
        );
    }

    #[test]
    fn test_absent_input() {
        let (waypoints, route) = extractor().extract(None);
        assert!(waypoints.is_empty());
        assert!(route.is_none());
    }

    #[test]
    fn test_missing_route_uses_sentinel() {
        let (waypoints, route) =
            extractor().extract(Some("1. **Bluefield**\nSummary: Coal town."));
        assert_eq!(waypoints.len(), 1);
        assert!(route.unwrap().is_not_found());
    }

    #[test]
    fn test_empty_field_values_use_sentinel() {
        let (waypoints, _) = extractor().extract(Some(
            "1. **Salem**\nSummary:\nScript Writer Directive:   \n",
        ));
        assert_eq!(
            waypoints,
            vec![WaypointSpec::new("Salem", NOT_FOUND, NOT_FOUND)]
        );
    }

    #[test]
    fn test_emphasis_only_value_uses_sentinel() {
        let (waypoints, _) =
            extractor().extract(Some("1. **Salem**\nSummary: **\nScript Writer Directive: go"));
        assert_eq!(waypoints[0].summary(), NOT_FOUND);
        assert_eq!(waypoints[0].directive(), "go");
    }

    #[test]
    fn test_empty_route_line_uses_sentinel() {
        let (_, route) = extractor().extract(Some("Primary Route:\n1. **A**\nSummary: x"));
        assert!(route.unwrap().is_not_found());
    }

    #[test]
    fn test_route_case_insensitive_and_emphasis() {
        let (_, route) =
            extractor().extract(Some("Intro\n**PRIMARY ROUTE:** US-460 West\nmore"));
        assert_eq!(route.unwrap().as_str(), "US-460 West");
    }

    #[test]
    fn test_blocks_without_summary_dropped() {
        let agenda = "Here is your agenda!\n1. **Christiansburg**\nJust a note, no label.\n2. **Radford**\nSummary: River town.\n\nSafe travels.";
        let (waypoints, _) = extractor().extract(Some(agenda));
        assert_eq!(waypoints.len(), 1);
        assert_eq!(waypoints[0].title(), "Radford");
    }

    #[test]
    fn test_field_independence() {
        let agenda = "1. **Pearisburg**\nSummary: County seat.\n2. Summary: untitled stop.\nScript Writer Directive: improvise.";
        let (waypoints, _) = extractor().extract(Some(agenda));

        assert_eq!(waypoints.len(), 1);
        let stop = &waypoints[0];
        assert_eq!(stop.title(), "Pearisburg");
        assert_eq!(stop.summary(), "County seat.");
        // The second item has no emphasis, so it is not a separate block
        assert_eq!(stop.directive(), "improvise.");
    }

    #[test]
    fn test_missing_directive_is_sentinel() {
        let (waypoints, _) =
            extractor().extract(Some("x\n1. **Narrows**\nSummary: New River narrows."));
        assert_eq!(waypoints[0].title(), "Narrows");
        assert_eq!(waypoints[0].summary(), "New River narrows.");
        assert_eq!(waypoints[0].directive(), NOT_FOUND);
    }

    #[test]
    fn test_missing_title_is_sentinel() {
        let (waypoints, _) = extractor().extract(Some("Summary: orphan stop."));
        assert_eq!(waypoints.len(), 1);
        assert_eq!(waypoints[0].title(), NOT_FOUND);
        assert_eq!(waypoints[0].summary(), "orphan stop.");
    }

    #[test]
    fn test_emphasis_stripped_from_fields() {
        let agenda = "1. **Hinton**\n**Summary:** *Rail* town.\n**Script Writer Directive:** focus on **John Henry**.";
        let (waypoints, _) = extractor().extract(Some(agenda));
        assert_eq!(waypoints[0].summary(), "Rail town.");
        assert_eq!(waypoints[0].directive(), "focus on John Henry.");
    }

    #[test]
    fn test_order_preserved_and_idempotent() {
        let agenda = (1..=8)
            .map(|i| format!("{i}. **Stop {i}**\nSummary: fact {i}.\nScript Writer Directive: angle {i}."))
            .collect::<Vec<_>>()
            .join("\n");
        let extractor = extractor();

        let first = extractor.extract(Some(&agenda));
        let second = extractor.extract(Some(&agenda));
        assert_eq!(first, second);

        let titles: Vec<&str> = first.0.iter().map(|w| w.title().as_str()).collect();
        let expected: Vec<String> = (1..=8).map(|i| format!("Stop {i}")).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let result = RegexFieldExtractor::with_patterns("(", r"\n", "x", "y", "z");
        assert!(result.is_err());
    }
}
