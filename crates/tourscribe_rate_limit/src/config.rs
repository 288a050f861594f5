//! Layered configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`include_str!` of the workspace `tourscribe.toml`)
//! 2. `~/.config/tourscribe/tourscribe.toml`
//! 3. `./tourscribe.toml`
//! 4. An explicit file, when given
//! 5. `TOURSCRIBE_*` environment variables (`TOURSCRIBE_TOUR__MAX_REVISIONS=5`)

use crate::Tier;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tourscribe_core::{FailurePolicy, TourConfig};
use tourscribe_error::{
    ConfigError, RateLimitError, RateLimitErrorKind, TourscribeError, TourscribeResult,
};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../tourscribe.toml");

/// Model-specific rate limit overrides.
///
/// ```toml
/// [providers.gemini.tiers.free.models."gemini-2.5-pro"]
/// rpm = 2
/// rpd = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ModelTierConfig {
    /// Requests per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Tokens per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm: Option<u64>,

    /// Requests per day limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Limits for one API tier. `None` means unlimited.
///
/// ```toml
/// [providers.gemini.tiers.free]
/// name = "Free"
/// rpm = 10
/// tpm = 250_000
/// rpd = 250
/// max_concurrent = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free", "Tier 1")
    pub name: String,

    /// Requests per minute limit
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Tokens per minute limit
    #[serde(default)]
    pub tpm: Option<u64>,

    /// Requests per day limit
    #[serde(default)]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests
    #[serde(default)]
    pub max_concurrent: Option<u32>,

    /// Model-specific rate limit overrides
    #[serde(default)]
    pub models: HashMap<String, ModelTierConfig>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn tpm(&self) -> Option<u64> {
        self.tpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// A tier with no limits at all.
    pub fn unlimited() -> Self {
        Self {
            name: "Unlimited".to_string(),
            rpm: None,
            tpm: None,
            rpd: None,
            max_concurrent: None,
            models: HashMap::new(),
        }
    }

    /// Tier limits with the overrides for `model_name` applied.
    pub fn for_model(&self, model_name: &str) -> TierConfig {
        match self.models.get(model_name) {
            Some(model) => TierConfig {
                name: self.name.clone(),
                rpm: model.rpm.or(self.rpm),
                tpm: model.tpm.or(self.tpm),
                rpd: model.rpd.or(self.rpd),
                max_concurrent: model.max_concurrent.or(self.max_concurrent),
                models: HashMap::new(),
            },
            None => self.clone(),
        }
    }
}

/// Configuration for a specific provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    pub tiers: HashMap<String, TierConfig>,
}

/// `[tour]` section: writer/director settings for a run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TourSection {
    /// Model used for drafting and reviewing
    pub generation_model: String,
    /// Draft/review rounds per stop
    pub max_revisions: u32,
    /// Writer sampling temperature
    pub writer_temperature: f32,
    /// Director sampling temperature
    pub director_temperature: f32,
    /// Let the writer use web search
    pub writer_web_search: bool,
    /// Per-call timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Continuity context cap in characters
    pub max_context_chars: Option<usize>,
    /// Abort the run on the first failed stop
    pub strict: bool,
}

impl Default for TourSection {
    fn default() -> Self {
        Self {
            generation_model: TourConfig::DEFAULT_MODEL.to_string(),
            max_revisions: TourConfig::DEFAULT_MAX_REVISIONS,
            writer_temperature: TourConfig::DEFAULT_WRITER_TEMPERATURE,
            director_temperature: TourConfig::DEFAULT_DIRECTOR_TEMPERATURE,
            writer_web_search: true,
            request_timeout_secs: None,
            max_context_chars: None,
            strict: false,
        }
    }
}

/// `[planner]` section: the upstream agenda planner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerSection {
    /// Planner model
    pub model: String,
    /// Output token cap for the agenda
    pub max_output_tokens: u32,
    /// Let the planner use maps lookups
    pub use_maps: bool,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-exp".to_string(),
            max_output_tokens: 8192,
            use_maps: true,
        }
    }
}

/// `[output]` section: where finished tours go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSection {
    /// Markdown document path
    pub path: PathBuf,
    /// Directory for per-stop transcript files
    pub transcripts_dir: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tour_script.md"),
            transcripts_dir: None,
        }
    }
}

/// Top-level tourscribe configuration.
///
/// # Example
///
/// ```no_run
/// use tourscribe_rate_limit::TourscribeConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TourscribeConfig::load()?;
/// let tour = config.tour_config()?;
/// println!("revision cap: {}", tour.max_revisions());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct TourscribeConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Writer/director settings
    #[serde(default)]
    pub tour: TourSection,

    /// Agenda planner settings
    #[serde(default)]
    pub planner: PlannerSection,

    /// Output locations
    #[serde(default)]
    pub output: OutputSection,
}

impl TourscribeConfig {
    /// Load configuration from a single file, without defaults or environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> TourscribeResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                TourscribeError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                TourscribeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// The bundled defaults alone, ignoring user files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    pub fn bundled() -> TourscribeResult<Self> {
        toml_config(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load the bundled defaults layered with user files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn load() -> TourscribeResult<Self> {
        Self::load_with(None)
    }

    /// Like [`load`](Self::load), with an extra required file layered above
    /// the user files and below the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `extra` is missing or any source cannot be parsed.
    #[instrument]
    pub fn load_with(extra: Option<&Path>) -> TourscribeResult<Self> {
        debug!("Loading configuration: env > explicit file > current dir > home dir > bundled");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/tourscribe/tourscribe.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("tourscribe").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TOURSCRIBE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        toml_config(builder)
    }

    /// Get tier configuration for a provider, if present.
    ///
    /// `tier_name` falls back to the provider's default tier.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;
        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }

    /// Like [`get_tier`](Self::get_tier), but a missing provider or tier is an error.
    ///
    /// # Errors
    ///
    /// Returns a [`RateLimitError`] naming what was missing.
    pub fn require_tier(&self, provider: &str, tier_name: Option<&str>) -> TourscribeResult<TierConfig> {
        let provider_config = self.providers.get(provider).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::UnknownProvider(provider.to_string()))
        })?;
        let tier = tier_name.unwrap_or(&provider_config.default_tier);
        provider_config.tiers.get(tier).cloned().ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::InvalidTier(format!(
                "{} has no tier named {}",
                provider, tier
            )))
            .into()
        })
    }

    /// Validated [`TourConfig`] built from the `[tour]` section.
    ///
    /// # Errors
    ///
    /// Returns an error if any `[tour]` value is out of range.
    pub fn tour_config(&self) -> TourscribeResult<TourConfig> {
        let tour = &self.tour;
        let mut builder = TourConfig::builder()
            .generation_model_id(tour.generation_model.clone())
            .max_revisions(tour.max_revisions)
            .writer_temperature(tour.writer_temperature)
            .director_temperature(tour.director_temperature)
            .writer_web_search(tour.writer_web_search)
            .failure_policy(if tour.strict {
                FailurePolicy::Strict
            } else {
                FailurePolicy::Lenient
            });
        if let Some(secs) = tour.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(chars) = tour.max_context_chars {
            builder = builder.max_context_chars(chars);
        }
        builder.build()
    }
}

fn toml_config(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> TourscribeResult<TourscribeConfig> {
    builder
        .build()
        .map_err(|e| {
            TourscribeError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            TourscribeError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}
