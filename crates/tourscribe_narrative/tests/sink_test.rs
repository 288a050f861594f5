//! Tests for document sinks.

use tempfile::TempDir;
use tourscribe_core::{RouteLabel, SegmentOutcome, TourDocument, TourSegment};
use tourscribe_interface::DocumentSink;
use tourscribe_narrative::{MarkdownSink, TranscriptDirSink, render_markdown};

fn document() -> TourDocument {
    let mut doc = TourDocument::new();
    doc.push(TourSegment::new(
        1,
        "Blacksburg",
        "If you look to your left...",
        SegmentOutcome::Approved { revisions: 1 },
    ));
    doc.push(TourSegment::new(
        2,
        "New River Gorge Bridge",
        "Now, notice the arch.",
        SegmentOutcome::Capped {
            revisions: 3,
            feedback: "Mention Bridge Day.".to_string(),
        },
    ));
    doc
}

#[tokio::test]
async fn test_markdown_sink_writes_rendered_document() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tour_script.md");
    let route = RouteLabel::new("US-19 North");

    MarkdownSink::new(&path).write(&route, &document()).await?;

    let written = std::fs::read_to_string(&path)?;
    assert_eq!(written, render_markdown(&route, &document()));
    assert!(written.contains("2. [New River Gorge Bridge](#stop-2)"));
    Ok(())
}

#[tokio::test]
async fn test_markdown_sink_overwrites() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tour.md");
    std::fs::write(&path, "stale content that is quite long")?;

    MarkdownSink::new(&path)
        .write(&RouteLabel::new("I-77"), &TourDocument::new())
        .await?;

    let written = std::fs::read_to_string(&path)?;
    assert!(!written.contains("stale"));
    Ok(())
}

#[tokio::test]
async fn test_markdown_sink_missing_directory_fails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("missing").join("tour.md");

    let result = MarkdownSink::new(&path)
        .write(&RouteLabel::new("I-77"), &document())
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to write tour document"));
    Ok(())
}

#[tokio::test]
async fn test_transcript_dir_sink() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let out = dir.path().join("tour_project_v1");

    TranscriptDirSink::new(&out)
        .write(&RouteLabel::new("US-19 North"), &document())
        .await?;

    let first = std::fs::read_to_string(out.join("point_01_Blacksburg.md"))?;
    assert_eq!(first, "# Blacksburg\n\nIf you look to your left...");

    let second = std::fs::read_to_string(out.join("point_02_New_River_Gorge_Bridge.md"))?;
    assert!(second.starts_with("# New River Gorge Bridge\n\n"));
    Ok(())
}
