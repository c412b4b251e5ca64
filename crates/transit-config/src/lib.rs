//! Transit configuration system
//!
//! This crate provides centralized configuration for the transition
//! synthesizer, loading settings from `transit.toml` with environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "transit.toml";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TransitConfig {
    /// Timing settings for synthesized animations
    pub animation: AnimationConfig,
    /// Resource lookup settings
    pub resources: ResourceConfig,
    /// Diagnostic output settings
    pub diagnostics: DiagnosticsConfig,
}

/// Timing configuration for synthesized animations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Platform "short" duration, used for activity open/close transitions
    pub short_duration_ms: u64,
    /// Duration used for every other transition kind
    pub default_duration_ms: u64,
    /// Fraction of the animation over which thumbnail fades ramp linearly
    pub thumbnail_fade_fraction: f32,
    /// Factor of the decelerating curve (1.5 gives a cubic ease-out)
    pub decelerate_factor: f32,
}

/// Resource lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Package that owns platform-reserved resource ids
    pub platform_package: String,
}

/// Diagnostic output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log every synthesized animation at debug level
    pub log_animations: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            short_duration_ms: 200,
            default_duration_ms: 250,
            thumbnail_fade_fraction: 0.25,
            decelerate_factor: 1.5,
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            platform_package: "android".to_string(),
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl TransitConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `transit.toml` in the current directory,
    /// or return the default configuration if the file is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("TRANSIT_SHORT_DURATION_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.animation.short_duration_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("TRANSIT_DEFAULT_DURATION_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.animation.default_duration_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("TRANSIT_FADE_FRACTION") {
            if let Ok(fraction) = val.parse::<f32>() {
                self.animation.thumbnail_fade_fraction = fraction;
            }
        }
        if let Ok(package) = std::env::var("TRANSIT_PLATFORM_PACKAGE") {
            self.resources.platform_package = package;
        }
        if let Ok(val) = std::env::var("TRANSIT_LOG_ANIMATIONS") {
            self.diagnostics.log_animations = parse_flag(&val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from transit.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Load configuration from an explicit file, then apply environment overrides
    pub fn load_with_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_env();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransitConfig::default();
        assert_eq!(config.animation.short_duration_ms, 200);
        assert_eq!(config.animation.default_duration_ms, 250);
        assert!((config.animation.thumbnail_fade_fraction - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.resources.platform_package, "android");
        assert!(!config.diagnostics.log_animations);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TransitConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: TransitConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.animation.default_duration_ms, 250);
        assert_eq!(parsed.resources.platform_package, "android");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: TransitConfig = toml::from_str(
            r#"
            [animation]
            short_duration_ms = 150
            "#,
        )
        .unwrap();
        assert_eq!(parsed.animation.short_duration_ms, 150);
        assert_eq!(parsed.animation.default_duration_ms, 250);
        assert!((parsed.animation.decelerate_factor - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TransitConfig::load_from_file("definitely/not/here/transit.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("TRANSIT_SHORT_DURATION_MS", "120");
            std::env::set_var("TRANSIT_PLATFORM_PACKAGE", "system");
            std::env::set_var("TRANSIT_FADE_FRACTION", "not-a-number");
        }

        let mut config = TransitConfig::default();
        config.merge_with_env();

        assert_eq!(config.animation.short_duration_ms, 120);
        assert_eq!(config.resources.platform_package, "system");
        assert!((config.animation.thumbnail_fade_fraction - 0.25).abs() < f32::EPSILON);

        unsafe {
            std::env::remove_var("TRANSIT_SHORT_DURATION_MS");
            std::env::remove_var("TRANSIT_PLATFORM_PACKAGE");
            std::env::remove_var("TRANSIT_FADE_FRACTION");
        }
    }
}
