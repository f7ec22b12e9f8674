//! Data model: log entries, metrics, lifecycle state, speed, theme selection

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Timestamp layout used on every log entry: `YYYY-MM-DD HH:MM:SS.mmm`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current UTC time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Accent,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Accent => "accent",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

/// One line of the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: String,
    pub message: String,
    pub severity: Severity,
    pub source: String,
}

impl LogEntry {
    pub fn new(
        id: u64,
        message: impl Into<String>,
        severity: Severity,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp: timestamp_now(),
            message: message.into(),
            severity,
            source: source.into(),
        }
    }

    /// The `HH:MM:SS.mmm` part of the timestamp.
    pub fn clock(&self) -> &str {
        self.timestamp
            .split_once(' ')
            .map(|(_, time)| time)
            .unwrap_or(&self.timestamp)
    }

    /// Plain transcript line: `[HH:MM:SS.mmm] source: message`.
    pub fn to_line(&self) -> String {
        format!("[{}] {}: {}", self.clock(), self.source, self.message)
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Cosmetic gauges. Percent fields live in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub consciousness: f64,
    pub neural_activity: u32,
    pub uptime_secs: u64,
}

impl Metrics {
    /// Uptime rendered as `Xm Ys`.
    pub fn uptime_label(&self) -> String {
        format!("{}m {}s", self.uptime_secs / 60, self.uptime_secs % 60)
    }
}

// ---------------------------------------------------------------------------
// SimulationState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SimulationState {
    Booting,
    Running,
    Stopped,
}

impl SimulationState {
    pub fn label(&self) -> &'static str {
        match self {
            SimulationState::Booting => "BOOTING",
            SimulationState::Running => "RUNNING",
            SimulationState::Stopped => "STOPPED",
        }
    }

    /// True while timers are armed (booting or running).
    pub fn is_active(&self) -> bool {
        !matches!(self, SimulationState::Stopped)
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Speed
// ---------------------------------------------------------------------------

/// Global pacing multiplier: 0.5..=5.0 in steps of 0.5.
///
/// Stored as a count of half-steps so equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(10);
    pub const NORMAL: Speed = Speed(2);
    pub const STEP: f64 = 0.5;

    /// Accepts only exact multiples of 0.5 inside the range.
    pub fn new(value: f64) -> Result<Self> {
        let halves = value / Self::STEP;
        if !value.is_finite() || halves.fract() != 0.0 {
            return Err(Error::InvalidSpeed(value));
        }
        let halves = halves as i64;
        if halves < Self::MIN.0 as i64 || halves > Self::MAX.0 as i64 {
            return Err(Error::InvalidSpeed(value));
        }
        Ok(Self(halves as u8))
    }

    /// Snap to the closest valid speed.
    pub fn nearest(value: f64) -> Self {
        if !value.is_finite() {
            return Self::NORMAL;
        }
        let halves = (value / Self::STEP).round();
        let halves = halves.clamp(Self::MIN.0 as f64, Self::MAX.0 as f64);
        Self(halves as u8)
    }

    pub fn value(&self) -> f64 {
        self.0 as f64 * Self::STEP
    }

    pub fn faster(&self) -> Self {
        Self((self.0 + 1).min(Self::MAX.0))
    }

    pub fn slower(&self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    /// `base_ms / speed` as a duration. Saturates instead of overflowing.
    pub fn scale(&self, base_ms: u64) -> Duration {
        Duration::from_millis(base_ms).saturating_mul(2) / u32::from(self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.value())
    }
}

impl Serialize for Speed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Speed {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Speed::new(value).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// ThemeName
// ---------------------------------------------------------------------------

/// The four visual presets. Palettes live in the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Default,
    #[default]
    Matrix,
    Cyberpunk,
    Retro,
}

impl ThemeName {
    pub const ALL: [ThemeName; 4] = [
        ThemeName::Default,
        ThemeName::Matrix,
        ThemeName::Cyberpunk,
        ThemeName::Retro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Matrix => "matrix",
            ThemeName::Cyberpunk => "cyberpunk",
            ThemeName::Retro => "retro",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownTheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_rejects_off_step_values() {
        assert!(Speed::new(0.75).is_err());
        assert!(Speed::new(0.0).is_err());
        assert!(Speed::new(5.5).is_err());
        assert!(Speed::new(f64::NAN).is_err());
        assert_eq!(Speed::new(2.5).unwrap().value(), 2.5);
    }

    #[test]
    fn speed_nearest_snaps_and_clamps() {
        assert_eq!(Speed::nearest(0.1), Speed::MIN);
        assert_eq!(Speed::nearest(9.0), Speed::MAX);
        assert_eq!(Speed::nearest(1.2).value(), 1.0);
        assert_eq!(Speed::nearest(1.3).value(), 1.5);
    }

    #[test]
    fn speed_steps_saturate() {
        assert_eq!(Speed::MAX.faster(), Speed::MAX);
        assert_eq!(Speed::MIN.slower(), Speed::MIN);
        assert_eq!(Speed::NORMAL.faster().value(), 1.5);
    }

    #[test]
    fn speed_scales_periods() {
        assert_eq!(Speed::new(5.0).unwrap().scale(300), Duration::from_millis(60));
        assert_eq!(Speed::new(0.5).unwrap().scale(1000), Duration::from_millis(2000));
        assert_eq!(Speed::NORMAL.scale(2000), Duration::from_millis(2000));
    }

    #[test]
    fn speed_scale_handles_huge_periods() {
        assert!(Speed::MIN.scale(u64::MAX) > Duration::from_millis(u64::MAX));
        assert!(Speed::NORMAL.scale(10_000_000_000_000) > Duration::from_secs(1_000_000));
    }

    #[test]
    fn theme_cycles_through_all_presets() {
        let mut theme = ThemeName::Default;
        for expected in [ThemeName::Matrix, ThemeName::Cyberpunk, ThemeName::Retro, ThemeName::Default] {
            theme = theme.next();
            assert_eq!(theme, expected);
        }
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Cyberpunk".parse::<ThemeName>().unwrap(), ThemeName::Cyberpunk);
        assert!("neon".parse::<ThemeName>().is_err());
    }

    #[test]
    fn entry_clock_drops_date() {
        let mut entry = LogEntry::new(1, "hello", Severity::Info, "system");
        entry.timestamp = "2026-01-02 03:04:05.678".to_string();
        assert_eq!(entry.clock(), "03:04:05.678");
        assert_eq!(entry.to_line(), "[03:04:05.678] system: hello");
    }

    #[test]
    fn uptime_label_splits_minutes() {
        let metrics = Metrics { uptime_secs: 125, ..Metrics::default() };
        assert_eq!(metrics.uptime_label(), "2m 5s");
    }
}
