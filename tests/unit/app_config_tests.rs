/*!
 * Tests for configuration loading, defaults, and validation
 */

use polysub::app_config::{Config, LogLevel};

use crate::common::create_temp_dir;

#[test]
fn test_default_config_shouldCarryDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "fa");
    assert_eq!(config.translation.concurrent_requests, 4);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.retry_base_delay_ms, 1000);
    assert_eq!(config.translation.max_retry_delay_ms, 16_000);
    assert_eq!(config.translation.chunk_size, 50);
    assert_eq!(config.translation.chunk_pause_ms, 500);
    assert!(config.translation.cache_enabled);
    assert_eq!(config.audio.sample_rate, 16_000);
    assert_eq!(config.reflow.min_duration, 0.8);
    assert_eq!(config.reflow.max_duration, 7.0);
    assert_eq!(config.subtitle.max_chars_per_line, 42);
    assert_eq!(config.subtitle.sentences_per_paragraph, 3);
    assert!(config.subtitle.bilingual);
    assert_eq!(config.quality.low_confidence_threshold, 0.5);
    assert!(config.resume_processing);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_default_config_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    let json = r#"{
        "target_language": "es",
        "translation": { "endpoint": "http://translate.local:5000" }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.target_language, "es");
    assert_eq!(config.translation.endpoint, "http://translate.local:5000");
    // Everything not named falls back to defaults
    assert_eq!(config.source_language, "auto");
    assert_eq!(config.translation.concurrent_requests, 4);
    assert_eq!(config.reflow.max_duration, 7.0);
}

#[test]
fn test_config_saveAndLoad_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "es".to_string();
    config.translation.concurrent_requests = 8;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.target_language, "es");
    assert_eq!(loaded.translation.concurrent_requests, 8);
}

#[test]
fn test_validate_withAutoTargetLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "auto".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "zz".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.translation.concurrent_requests = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withInvertedReflowBounds_shouldFail() {
    let mut config = Config::default();
    config.reflow.min_duration = 8.0;
    config.reflow.max_duration = 2.0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeThreshold_shouldFail() {
    let mut config = Config::default();
    config.quality.low_confidence_threshold = 1.5;

    assert!(config.validate().is_err());
}

#[test]
fn test_log_level_fromStr_shouldParseKnownLevels() {
    assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
    assert_eq!("ERROR".parse::<LogLevel>().unwrap(), LogLevel::Error);
    assert!("verbose".parse::<LogLevel>().is_err());
}
