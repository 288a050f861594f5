//! Document sinks: a single markdown script, per-stop transcripts, and an
//! in-memory recorder.

use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tourscribe_core::{RouteLabel, TourDocument};
use tourscribe_error::{TourError, TourErrorKind, TourscribeResult};
use tourscribe_interface::DocumentSink;
use tracing::{info, instrument};

/// Attribution line under the document title.
const ATTRIBUTION: &str = "*Generated by AI Narrative Architect & Script Writer*";

/// Render a tour as a single markdown script.
///
/// A table of contents links to one anchored section per stop, in document
/// order.
///
/// # Examples
///
/// ```
/// use tourscribe_core::{RouteLabel, SegmentOutcome, TourDocument, TourSegment};
/// use tourscribe_narrative::render_markdown;
///
/// let mut doc = TourDocument::new();
/// doc.push(TourSegment::new(1, "Salem", "Welcome.", SegmentOutcome::Approved { revisions: 1 }));
///
/// let md = render_markdown(&RouteLabel::new("I-81 South"), &doc);
/// assert!(md.starts_with("# Audio Tour: I-81 South\n"));
/// assert!(md.contains("1. [Salem](#stop-1)\n"));
/// assert!(md.contains("## <a name='stop-1'></a> Stop 1: Salem\nWelcome."));
/// ```
pub fn render_markdown(route: &RouteLabel, document: &TourDocument) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write!(out, "# Audio Tour: {}\n{}\n\n---\n\n## Tour Stops\n", route, ATTRIBUTION);

    for segment in document {
        let _ = writeln!(
            out,
            "{}. [{}](#stop-{})",
            segment.position(),
            segment.title(),
            segment.position()
        );
    }
    out.push_str("\n---\n\n");

    for segment in document {
        let _ = write!(
            out,
            "## <a name='stop-{pos}'></a> Stop {pos}: {}\n{}\n\n---\n\n",
            segment.title(),
            segment.text(),
            pos = segment.position()
        );
    }
    out
}

/// File name for one stop's transcript, e.g. `point_03_Natural_Bridge.md`.
///
/// Spaces and path separators in the title become underscores.
pub fn transcript_file_name(position: usize, title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("point_{:02}_{}.md", position, stem)
}

#[track_caller]
fn sink_error(path: &Path, err: std::io::Error) -> tourscribe_error::TourscribeError {
    TourError::new(TourErrorKind::SinkFailed(format!("{}: {}", path.display(), err))).into()
}

/// Writes the whole tour to one markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownSink {
    path: PathBuf,
}

impl MarkdownSink {
    /// Sink writing to `path`, replacing any existing file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentSink for MarkdownSink {
    #[instrument(skip_all, fields(path = %self.path.display(), stops = document.len()))]
    async fn write(&self, route: &RouteLabel, document: &TourDocument) -> TourscribeResult<()> {
        let markdown = render_markdown(route, document);
        tokio::fs::write(&self.path, markdown)
            .await
            .map_err(|e| sink_error(&self.path, e))?;
        info!("Tour script saved");
        Ok(())
    }
}

/// Writes one markdown file per stop into a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDirSink {
    dir: PathBuf,
}

impl TranscriptDirSink {
    /// Sink writing into `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentSink for TranscriptDirSink {
    #[instrument(skip_all, fields(dir = %self.dir.display(), stops = document.len()))]
    async fn write(&self, _route: &RouteLabel, document: &TourDocument) -> TourscribeResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| sink_error(&self.dir, e))?;

        for segment in document {
            let path = self
                .dir
                .join(transcript_file_name(*segment.position(), segment.title()));
            let body = format!("# {}\n\n{}", segment.title(), segment.text());
            tokio::fs::write(&path, body)
                .await
                .map_err(|e| sink_error(&path, e))?;
        }
        info!("Transcripts saved");
        Ok(())
    }
}

/// Records every document it receives.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    writes: Arc<Mutex<Vec<(RouteLabel, TourDocument)>>>,
}

impl InMemorySink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, oldest first.
    pub fn writes(&self) -> Vec<(RouteLabel, TourDocument)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of writes received.
    pub fn write_count(&self) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl DocumentSink for InMemorySink {
    async fn write(&self, route: &RouteLabel, document: &TourDocument) -> TourscribeResult<()> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((route.clone(), document.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourscribe_core::{SegmentOutcome, TourSegment};

    fn document() -> TourDocument {
        let mut doc = TourDocument::new();
        doc.push(TourSegment::new(
            1,
            "Blacksburg",
            "Welcome to Blacksburg.",
            SegmentOutcome::Approved { revisions: 1 },
        ));
        doc.push(TourSegment::failed(2, "Roanoke", "timed out"));
        doc
    }

    #[test]
    fn test_render_full_layout() {
        let md = render_markdown(&RouteLabel::new("I-81 South"), &document());
        let expected = "# Audio Tour: I-81 South\n\
            *Generated by AI Narrative Architect & Script Writer*\n\n\
            ---\n\n\
            ## Tour Stops\n\
            1. [Blacksburg](#stop-1)\n\
            2. [Roanoke](#stop-2)\n\
            \n---\n\n\
            ## <a name='stop-1'></a> Stop 1: Blacksburg\nWelcome to Blacksburg.\n\n---\n\n\
            ## <a name='stop-2'></a> Stop 2: Roanoke\n[Segment unavailable: timed out]\n\n---\n\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_render_empty_document() {
        let md = render_markdown(&RouteLabel::not_found(), &TourDocument::new());
        assert!(md.starts_with("# Audio Tour: Route not found\n"));
        assert!(md.ends_with("## Tour Stops\n\n---\n\n"));
    }

    #[test]
    fn test_transcript_file_name() {
        assert_eq!(
            transcript_file_name(3, "Natural Bridge"),
            "point_03_Natural_Bridge.md"
        );
        assert_eq!(transcript_file_name(12, "A/B Test"), "point_12_A_B_Test.md");
    }

    #[tokio::test]
    async fn test_in_memory_sink_records() {
        let sink = InMemorySink::new();
        sink.write(&RouteLabel::new("US-460"), &document())
            .await
            .unwrap();
        assert_eq!(sink.write_count(), 1);
        assert_eq!(sink.writes()[0].1.len(), 2);
    }
}
