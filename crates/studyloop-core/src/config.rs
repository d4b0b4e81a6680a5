//! TOML-based engine configuration.
//!
//! Holds every tunable constant of the engines:
//! - Confidence window, weights and the zero-response-time policy
//! - Cycle scope and mastery/weakness thresholds
//! - Difficulty to expected-seconds mapping
//! - Peak-time sample threshold and the UTC offset used for hour-of-day
//! - Schedule durations and fatigue/momentum thresholds
//!
//! Configuration is stored at `~/.config/studyloop/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::confidence::ZeroTimePolicy;
use crate::cycle::CycleScope;
use crate::error::ConfigError;

/// Confidence scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Most recent attempts fed to the confidence engine
    #[serde(default = "default_confidence_window")]
    pub window: usize,
    #[serde(default = "default_accuracy_weight")]
    pub accuracy_weight: f64,
    #[serde(default = "default_speed_weight")]
    pub speed_weight: f64,
    #[serde(default)]
    pub zero_time_policy: ZeroTimePolicy,
}

/// Cycle analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Which attempts make up the "last five" of a cycle
    #[serde(default)]
    pub scope: CycleScope,
    #[serde(default = "default_mastery_accuracy")]
    pub mastery_accuracy: f64,
    #[serde(default = "default_max_wrong")]
    pub max_wrong: u32,
    #[serde(default = "default_low_accuracy")]
    pub low_accuracy: f64,
    /// Median time above `expected * slow_factor` is a slow response
    #[serde(default = "default_slow_factor")]
    pub slow_factor: f64,
}

/// Expected answer time per difficulty, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    #[serde(default = "default_easy_secs")]
    pub easy_secs: f64,
    #[serde(default = "default_medium_secs")]
    pub medium_secs: f64,
    #[serde(default = "default_hard_secs")]
    pub hard_secs: f64,
}

/// Peak-time detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakTimeConfig {
    #[serde(default = "default_min_history")]
    pub min_attempts: usize,
    /// Offset applied to UTC timestamps before taking the hour
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Schedule recommendation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_focus")]
    pub default_focus: u32,
    #[serde(default = "default_break")]
    pub default_break: u32,
    #[serde(default = "default_peak_focus")]
    pub peak_focus: u32,
    #[serde(default = "default_break")]
    pub peak_break: u32,
    #[serde(default = "default_fatigue_focus")]
    pub fatigue_focus: u32,
    #[serde(default = "default_fatigue_break")]
    pub fatigue_break: u32,
    #[serde(default = "default_momentum_focus")]
    pub momentum_focus: u32,
    #[serde(default = "default_break")]
    pub momentum_break: u32,
    /// Most recent attempts considered for fatigue/momentum
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    #[serde(default = "default_min_recent")]
    pub min_recent_attempts: usize,
    /// Recent accuracy (percent) strictly below this is fatigue
    #[serde(default = "default_fatigue_below")]
    pub fatigue_below_percent: f64,
    /// Recent accuracy (percent) at or above this is momentum
    #[serde(default = "default_momentum_from")]
    pub momentum_from_percent: f64,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/studyloop/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub difficulty: DifficultyConfig,
    #[serde(default)]
    pub peak_time: PeakTimeConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

// Default functions
fn default_confidence_window() -> usize {
    20
}
fn default_accuracy_weight() -> f64 {
    0.7
}
fn default_speed_weight() -> f64 {
    0.3
}
fn default_mastery_accuracy() -> f64 {
    0.85
}
fn default_max_wrong() -> u32 {
    2
}
fn default_low_accuracy() -> f64 {
    0.70
}
fn default_slow_factor() -> f64 {
    1.5
}
fn default_easy_secs() -> f64 {
    40.0
}
fn default_medium_secs() -> f64 {
    70.0
}
fn default_hard_secs() -> f64 {
    110.0
}
fn default_min_history() -> usize {
    15
}
fn default_focus() -> u32 {
    25
}
fn default_break() -> u32 {
    5
}
fn default_peak_focus() -> u32 {
    35
}
fn default_fatigue_focus() -> u32 {
    20
}
fn default_fatigue_break() -> u32 {
    10
}
fn default_momentum_focus() -> u32 {
    30
}
fn default_recent_window() -> usize {
    10
}
fn default_min_recent() -> usize {
    5
}
fn default_fatigue_below() -> f64 {
    50.0
}
fn default_momentum_from() -> f64 {
    80.0
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            window: default_confidence_window(),
            accuracy_weight: default_accuracy_weight(),
            speed_weight: default_speed_weight(),
            zero_time_policy: ZeroTimePolicy::default(),
        }
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            scope: CycleScope::default(),
            mastery_accuracy: default_mastery_accuracy(),
            max_wrong: default_max_wrong(),
            low_accuracy: default_low_accuracy(),
            slow_factor: default_slow_factor(),
        }
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            easy_secs: default_easy_secs(),
            medium_secs: default_medium_secs(),
            hard_secs: default_hard_secs(),
        }
    }
}

impl Default for PeakTimeConfig {
    fn default() -> Self {
        Self {
            min_attempts: default_min_history(),
            utc_offset_minutes: 0,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_focus: default_focus(),
            default_break: default_break(),
            peak_focus: default_peak_focus(),
            peak_break: default_break(),
            fatigue_focus: default_fatigue_focus(),
            fatigue_break: default_fatigue_break(),
            momentum_focus: default_momentum_focus(),
            momentum_break: default_break(),
            recent_window: default_recent_window(),
            min_recent_attempts: default_min_recent(),
            fatigue_below_percent: default_fatigue_below(),
            momentum_from_percent: default_momentum_from(),
        }
    }
}

/// Returns `~/.config/studyloop[-dev]/` based on STUDYLOOP_ENV.
///
/// Set STUDYLOOP_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYLOOP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyloop-dev")
    } else {
        base_dir.join("studyloop")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if part.is_empty() {
                return Err(ConfigError::UnknownKey(key.to_string()));
            }
            if parts.peek().is_some() {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                continue;
            }

            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(n) => {
                    if n.is_f64() {
                        value
                            .parse::<f64>()
                            .ok()
                            .and_then(serde_json::Number::from_f64)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as integer")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
