//! End-to-end tests through the facade re-exports.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tourscribe::{
    GenerateRequest, GenerateResponse, MarkdownSink, Output, ResponseFormat, TourConfig,
    TourDriver, TourOrchestrator, TourscribeConfig, TourscribeResult,
};

/// Rejects the first draft of every stop, approves the second.
#[derive(Default)]
struct PickyDirector {
    reviews: Arc<Mutex<usize>>,
}

#[async_trait]
impl TourDriver for PickyDirector {
    async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
        let text = match req.response_format() {
            ResponseFormat::Text => "Look to your left: the gorge.".to_string(),
            ResponseFormat::Json => {
                let mut reviews = self.reviews.lock().unwrap();
                *reviews += 1;
                let ready = *reviews % 2 == 0;
                format!(r#"{{"is_ready": {}, "feedback": "round {}"}}"#, ready, *reviews)
            }
        };
        Ok(GenerateResponse::new(vec![Output::Text(text)]))
    }

    fn provider_name(&self) -> &'static str {
        "picky"
    }

    fn model_name(&self) -> &str {
        "picky-1"
    }
}

const AGENDA: &str = "Primary Route: US-19 North\n\
1. **Summersville Lake**\n\
Summary: Largest lake in West Virginia.\n\
Script Writer Directive: describe the cliffs.\n\
2. **New River Gorge Bridge**\n\
Summary: Once the longest single-span arch bridge.\n\
Script Writer Directive: cover Bridge Day.";

#[tokio::test]
async fn test_tour_from_bundled_config() -> anyhow::Result<()> {
    let config = TourscribeConfig::bundled()?.tour_config()?;
    assert_eq!(config, TourConfig::default());

    let driver = PickyDirector::default();
    let reviews = driver.reviews.clone();
    let orchestrator = TourOrchestrator::new(driver, config)?;

    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("tour_script.md");
    let run = orchestrator
        .run_and_render(Some(AGENDA), &MarkdownSink::new(&path))
        .await?;

    assert_eq!(run.document().approved_count(), 2);
    assert_eq!(*reviews.lock().unwrap(), 4);

    let script = std::fs::read_to_string(&path)?;
    assert!(script.contains("## <a name='stop-2'></a> Stop 2: New River Gorge Bridge"));
    Ok(())
}
