//! Simulation configuration
//!
//! All tunable parameters in one place. Loaded from TOML at startup,
//! falls back to defaults if no config file exists.

use awaken_core::{Error, Result, Speed, ThemeName, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest accepted base period: one hour.
pub const MAX_PERIOD_MS: u64 = 3_600_000;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Pacing multiplier, 0.5..=5.0 in steps of 0.5.
    pub speed: Speed,
    /// Initial visual preset.
    pub theme: ThemeName,
    /// Console line capacity.
    pub capacity: usize,
    /// Seed for the random source. Unset means OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Base periods (before the speed multiplier) and odds.
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between boot messages.
    pub boot_step_ms: u64,
    /// Period of the consciousness activity logger.
    pub activity_ms: u64,
    /// Period of the metrics tick. Not scaled by speed.
    pub metrics_ms: u64,
    /// Period of the error injection roll.
    pub error_roll_ms: u64,
    /// Delay from an injected error to its recovery line.
    pub recovery_ms: u64,
    /// Chance that an error roll injects an error (0.0 - 1.0).
    pub error_probability: f64,
}

// ============================================================
// Defaults
// ============================================================

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed: Speed::NORMAL,
            theme: ThemeName::default(),
            capacity: DEFAULT_CAPACITY,
            seed: None,
            timing: TimingConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            boot_step_ms: 300,
            activity_ms: 2_000,
            metrics_ms: 1_000,
            error_roll_ms: 5_000,
            recovery_ms: 1_000,
            error_probability: 0.1,
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl SimConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.timing;
        let periods = [
            ("boot_step_ms", t.boot_step_ms),
            ("activity_ms", t.activity_ms),
            ("metrics_ms", t.metrics_ms),
            ("error_roll_ms", t.error_roll_ms),
            ("recovery_ms", t.recovery_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, ms)| *ms == 0) {
            return Err(Error::config(format!("timing.{} must be positive", name)));
        }
        if let Some((name, ms)) = periods.iter().find(|(_, ms)| *ms > MAX_PERIOD_MS) {
            return Err(Error::config(format!(
                "timing.{} must be at most {} ms, got {}",
                name, MAX_PERIOD_MS, ms
            )));
        }
        if !(0.0..=1.0).contains(&t.error_probability) {
            return Err(Error::config(format!(
                "timing.error_probability must be within 0.0..=1.0, got {}",
                t.error_probability
            )));
        }
        if self.capacity == 0 {
            return Err(Error::config("capacity must be positive"));
        }
        Ok(())
    }
}

impl TimingConfig {
    pub fn metrics_period(&self) -> Duration {
        Duration::from_millis(self.metrics_ms)
    }
}
