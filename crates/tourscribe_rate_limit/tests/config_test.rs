//! Tests for layered configuration.

use std::io::Write;
use tempfile::Builder;
use tourscribe_rate_limit::{Tier, TourscribeConfig};

#[test]
fn test_load_bundled_defaults() {
    let config = TourscribeConfig::bundled().unwrap();

    let gemini = &config.providers["gemini"];
    let free = &gemini.tiers["free"];
    assert_eq!(free.name, "Free");
    assert_eq!(free.rpm, Some(10));
    assert_eq!(free.tpm, Some(250_000));
    assert_eq!(free.rpd, Some(250));

    assert_eq!(config.tour.max_revisions, 3);
    assert_eq!(config.tour.generation_model, "gemini-2.5-flash");
    assert_eq!(config.planner.max_output_tokens, 8192);
    assert_eq!(config.output.path.to_str(), Some("tour_script.md"));
}

#[test]
fn test_get_tier_default_and_named() {
    let config = TourscribeConfig::bundled().unwrap();

    assert_eq!(config.get_tier("gemini", None).unwrap().name, "Free");
    assert_eq!(
        config.get_tier("gemini", Some("payasyougo")).unwrap().name(),
        "Pay-as-you-go"
    );
    assert!(config.get_tier("gemini", Some("platinum")).is_none());
    assert!(config.require_tier("gemini", Some("platinum")).is_err());
}

#[test]
fn test_config_from_file() {
    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        temp_file,
        r#"
[tour]
max_revisions = 5
strict = true
request_timeout_secs = 45

[providers.test]
default_tier = "custom"

[providers.test.tiers.custom]
name = "Custom Tier"
rpm = 42
"#
    )
    .unwrap();

    let config = TourscribeConfig::from_file(temp_file.path()).unwrap();
    let tier = config.get_tier("test", None).unwrap();
    assert_eq!(tier.rpm, Some(42));

    // Unset fields fall back to section defaults
    assert_eq!(config.tour.writer_temperature, 0.7);
    let tour = config.tour_config().unwrap();
    assert_eq!(*tour.max_revisions(), 5);
    assert_eq!(tour.request_timeout().map(|d| d.as_secs()), Some(45));
}

#[test]
fn test_explicit_file_layers_over_defaults() {
    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(temp_file, "[tour]\nmax_revisions = 4\n").unwrap();

    let config = TourscribeConfig::load_with(Some(temp_file.path())).unwrap();
    assert_eq!(config.tour.max_revisions, 4);
    assert!(config.providers.contains_key("gemini"));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let missing = std::path::Path::new("/nonexistent/tourscribe-missing.toml");
    assert!(TourscribeConfig::load_with(Some(missing)).is_err());
}
