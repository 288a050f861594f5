//! Command handlers.

use super::commands::{OutputArgs, TripArgs};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tourscribe::{
    ConfigError, DocumentSink, JsonError, MarkdownSink, RunStatus, TourDriver, TourOrchestrator,
    TourRun, TourscribeConfig, TourscribeResult, TranscriptDirSink, WaypointExtractor,
};
#[cfg(feature = "gemini")]
use tourscribe::{AgendaPlanner, AgendaSource, GeminiClient, PlannerSettings, trip_request};
use tracing::{info, warn};

/// Settings taken from global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Revision cap override
    pub max_revisions: Option<u32>,
    /// Generation model override
    pub model: Option<String>,
    /// Abort on first failed stop
    pub strict: bool,
    /// Rate limit tier
    pub tier: Option<String>,
    /// Disable API retries
    pub no_retry: bool,
}

/// Load layered configuration and apply CLI overrides to the `[tour]` section.
///
/// # Errors
///
/// Returns an error if any configuration source fails to load.
pub fn load_config(path: Option<&Path>, overrides: &RunOverrides) -> TourscribeResult<TourscribeConfig> {
    let mut config = TourscribeConfig::load_with(path)?;
    if let Some(max_revisions) = overrides.max_revisions {
        config.tour.max_revisions = max_revisions;
    }
    if let Some(model) = &overrides.model {
        config.tour.generation_model = model.clone();
    }
    if overrides.strict {
        config.tour.strict = true;
    }
    Ok(config)
}

/// Read agenda text from a file, or stdin for `-`.
///
/// # Errors
///
/// Returns a [`ConfigError`] naming the path when it cannot be read.
pub async fn read_agenda(path: &Path) -> TourscribeResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| ConfigError::new(format!("Failed to read agenda from stdin: {}", e)))?;
        return Ok(text);
    }

    tokio::fs::read_to_string(path).await.map_err(|e| {
        ConfigError::new(format!("Failed to read agenda {}: {}", path.display(), e)).into()
    })
}

/// Route and waypoints recovered from `agenda`, as pretty JSON.
///
/// # Errors
///
/// Returns an error if the extractor cannot be built or serialization fails.
pub fn extract_agenda(agenda: &str) -> TourscribeResult<String> {
    let (waypoints, route) = WaypointExtractor::new()?.extract(Some(agenda));
    let value = serde_json::json!({
        "route": route,
        "waypoints": waypoints,
    });
    serde_json::to_string_pretty(&value)
        .map_err(|e| JsonError::new(format!("Failed to serialize waypoints: {}", e)).into())
}

/// Sinks selected by flags, falling back to the `[output]` section.
fn sinks(config: &TourscribeConfig, output: &OutputArgs) -> Vec<Box<dyn DocumentSink>> {
    let script: PathBuf = output
        .output
        .clone()
        .unwrap_or_else(|| config.output.path.clone());
    let mut sinks: Vec<Box<dyn DocumentSink>> = vec![Box::new(MarkdownSink::new(script))];

    if let Some(dir) = output
        .transcripts
        .clone()
        .or_else(|| config.output.transcripts_dir.clone())
    {
        sinks.push(Box::new(TranscriptDirSink::new(dir)));
    }
    sinks
}

/// Generate a tour from agenda text with any driver and write it out.
///
/// # Errors
///
/// Returns configuration, generation (strict mode) or sink errors.
pub async fn write_with<D: TourDriver>(
    driver: D,
    config: &TourscribeConfig,
    agenda: Option<&str>,
    output: &OutputArgs,
) -> TourscribeResult<TourRun> {
    let orchestrator = TourOrchestrator::new(driver, config.tour_config()?)?;
    let run = orchestrator.run(agenda).await?;

    match (run.status(), run.route()) {
        (RunStatus::Completed, Some(route)) => {
            for sink in sinks(config, output) {
                sink.write(route, run.document()).await?;
            }
            info!(
                stops = run.document().len(),
                approved = run.document().approved_count(),
                capped = run.document().capped_count(),
                failed = run.document().failed_count(),
                "Tour written"
            );
        }
        _ => warn!("Agenda held no stops, nothing was written"),
    }
    Ok(run)
}

#[cfg(feature = "gemini")]
fn gemini_client(config: &TourscribeConfig, overrides: &RunOverrides) -> TourscribeResult<GeminiClient> {
    Ok(GeminiClient::new_with_config(config, overrides.tier.as_deref())?
        .with_model(config.tour.generation_model.clone())
        .with_retry(overrides.no_retry, None, None))
}

/// Plan an agenda for a trip.
///
/// # Errors
///
/// Returns client setup or planner errors.
#[cfg(feature = "gemini")]
pub async fn plan_agenda(
    config: &TourscribeConfig,
    overrides: &RunOverrides,
    trip: &TripArgs,
) -> TourscribeResult<Option<String>> {
    let client = gemini_client(config, overrides)?;
    let settings = PlannerSettings::new(
        config.planner.model.clone(),
        config.planner.max_output_tokens,
        config.planner.use_maps,
    );
    info!(from = %trip.from, to = %trip.to, "Planning route agenda");
    AgendaPlanner::new(
        client,
        settings,
        trip_request(&trip.from, &trip.to, trip.request.as_deref()),
    )
    .agenda()
    .await
}

/// Write a tour from existing agenda text with Gemini.
///
/// # Errors
///
/// Returns client setup, generation or sink errors.
#[cfg(feature = "gemini")]
pub async fn write_tour(
    config: &TourscribeConfig,
    overrides: &RunOverrides,
    agenda: Option<&str>,
    output: &OutputArgs,
) -> TourscribeResult<TourRun> {
    let client = gemini_client(config, overrides)?;
    write_with(client, config, agenda, output).await
}

/// Plan an agenda, optionally save it, then write the tour.
///
/// # Errors
///
/// Returns planner, generation or sink errors.
#[cfg(feature = "gemini")]
pub async fn plan_and_write(
    config: &TourscribeConfig,
    overrides: &RunOverrides,
    trip: &TripArgs,
    output: &OutputArgs,
    save_agenda: Option<&Path>,
) -> TourscribeResult<TourRun> {
    let agenda = plan_agenda(config, overrides, trip).await?;

    if let (Some(path), Some(text)) = (save_agenda, agenda.as_deref()) {
        tokio::fs::write(path, text).await.map_err(|e| {
            ConfigError::new(format!("Failed to save agenda {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Agenda saved");
    }

    write_tour(config, overrides, agenda.as_deref(), output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tourscribe::{GenerateRequest, GenerateResponse, Output, ResponseFormat};

    /// Writes one line per stop and approves everything.
    struct EchoDriver;

    #[async_trait]
    impl TourDriver for EchoDriver {
        async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
            let text = match req.response_format() {
                ResponseFormat::Json => r#"{"is_ready": true, "feedback": "Good"}"#.to_string(),
                ResponseFormat::Text => "A fine stop.".to_string(),
            };
            Ok(GenerateResponse::new(vec![Output::Text(text)]))
        }

        fn provider_name(&self) -> &'static str {
            "echo"
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    const AGENDA: &str = "Primary Route: WV-16\n1. **Fayetteville**\nSummary: Bridge town.\n2. **Thurmond**\nSummary: Ghost town.";

    #[tokio::test]
    async fn test_write_with_all_sinks() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let output = OutputArgs {
            output: Some(dir.path().join("tour.md")),
            transcripts: Some(dir.path().join("stops")),
        };
        let config = TourscribeConfig::bundled()?;

        let run = write_with(EchoDriver, &config, Some(AGENDA), &output).await?;

        assert_eq!(run.document().len(), 2);
        let script = std::fs::read_to_string(dir.path().join("tour.md"))?;
        assert!(script.starts_with("# Audio Tour: WV-16\n"));
        assert!(dir.path().join("stops").join("point_02_Thurmond.md").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_write_with_nothing_writes_nothing() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let output = OutputArgs {
            output: Some(dir.path().join("tour.md")),
            transcripts: None,
        };
        let config = TourscribeConfig::bundled()?;

        let run = write_with(EchoDriver, &config, None, &output).await?;

        assert_eq!(*run.status(), RunStatus::NothingToGenerate);
        assert!(!dir.path().join("tour.md").exists());
        Ok(())
    }

    #[test]
    fn test_extract_agenda_json() -> anyhow::Result<()> {
        let json: serde_json::Value = serde_json::from_str(&extract_agenda(AGENDA)?)?;
        assert_eq!(json["route"], "WV-16");
        assert_eq!(json["waypoints"][1]["title"], "Thurmond");
        assert_eq!(json["waypoints"][1]["directive"], "Not Found");
        Ok(())
    }

    #[test]
    fn test_overrides_apply() -> anyhow::Result<()> {
        let overrides = RunOverrides {
            max_revisions: Some(5),
            model: Some("gemini-2.5-pro".to_string()),
            strict: true,
            ..Default::default()
        };
        let config = load_config(None, &overrides)?;
        assert_eq!(config.tour.max_revisions, 5);
        assert_eq!(config.tour.generation_model, "gemini-2.5-pro");
        assert!(config.tour.strict);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_agenda() {
        let err = read_agenda(Path::new("/nonexistent/agenda.md")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read agenda"));
    }
}
