//! Study schedule recommendations.
//!
//! Focus/break durations come from an ordered rule cascade. Each rule that
//! holds overwrites whatever an earlier rule chose:
//!
//! 1. default
//! 2. peak time (current bucket is the user's peak bucket)
//! 3. fatigue (recent accuracy below 50%)
//! 4. momentum (recent accuracy at least 80%, only when not fatigued)

mod session;

pub use session::FocusSession;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attempt::Attempt;
use crate::config::{Config, ScheduleConfig};
use crate::peak_time::PeakTimeDetector;
use crate::stats::percent;
use crate::store::ActivityLog;
use crate::time_bucket::TimeBucket;

/// Rule that produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleReason {
    #[default]
    Default,
    PeakTime,
    FatigueDetected,
    LearningMomentum,
}

impl ScheduleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleReason::Default => "default",
            ScheduleReason::PeakTime => "peak_time",
            ScheduleReason::FatigueDetected => "fatigue_detected",
            ScheduleReason::LearningMomentum => "learning_momentum",
        }
    }
}

impl fmt::Display for ScheduleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs the cascade looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    /// Whole percent over the recent window (100 when empty)
    pub recent_accuracy: u32,
    pub activities_analyzed: usize,
    pub current_time_slot: Option<TimeBucket>,
    /// Set when the recommendation fell back after a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Recommended focus/break durations, in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecommendation {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub reason: ScheduleReason,
    pub context: RecommendationContext,
}

/// Applies the schedule rule cascade.
#[derive(Debug, Clone)]
pub struct ScheduleAdvisor {
    pub config: ScheduleConfig,
    pub peak: PeakTimeDetector,
}

impl Default for ScheduleAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleAdvisor {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.schedule.clone(),
            peak: PeakTimeDetector::from_config(&config.peak_time),
        }
    }

    /// Rule-1 settings, used as the fail-safe.
    pub fn fallback(&self, error: impl Into<String>) -> ScheduleRecommendation {
        ScheduleRecommendation {
            focus_minutes: self.config.default_focus,
            break_minutes: self.config.default_break,
            reason: ScheduleReason::Default,
            context: RecommendationContext {
                recent_accuracy: 100,
                activities_analyzed: 0,
                current_time_slot: None,
                error: Some(error.into()),
            },
        }
    }

    /// Run the cascade over already-fetched attempts.
    ///
    /// `recent` is most-recent-first and is cut to the configured recent
    /// window; records without a numeric accuracy are ignored there.
    /// `current_hour` is the local hour of day.
    pub fn evaluate(
        &self,
        recent: &[Attempt],
        history: &[Attempt],
        current_hour: u32,
    ) -> ScheduleRecommendation {
        let cfg = &self.config;
        let current_bucket = TimeBucket::from_hour(current_hour);

        let window: Vec<&Attempt> = recent
            .iter()
            .take(cfg.recent_window)
            .filter(|a| a.accuracy().is_some())
            .collect();
        let recent_accuracy = if window.is_empty() {
            100.0
        } else {
            let correct = window.iter().filter(|a| a.is_correct()).count();
            correct as f64 / window.len() as f64 * 100.0
        };
        let enough_recent = window.len() >= cfg.min_recent_attempts;

        // Rule 1
        let mut focus = cfg.default_focus;
        let mut brk = cfg.default_break;
        let mut reason = ScheduleReason::Default;

        // Rule 2
        let peak = self.peak.detect(history);
        if peak.ready && peak.bucket == Some(current_bucket) {
            focus = cfg.peak_focus;
            brk = cfg.peak_break;
            reason = ScheduleReason::PeakTime;
            tracing::debug!(bucket = %current_bucket, "peak time rule matched");
        }

        // Rules 3 and 4
        if enough_recent && recent_accuracy < cfg.fatigue_below_percent {
            focus = cfg.fatigue_focus;
            brk = cfg.fatigue_break;
            reason = ScheduleReason::FatigueDetected;
            tracing::debug!(recent_accuracy, "fatigue rule matched");
        } else if enough_recent && recent_accuracy >= cfg.momentum_from_percent {
            focus = cfg.momentum_focus;
            brk = cfg.momentum_break;
            reason = ScheduleReason::LearningMomentum;
            tracing::debug!(recent_accuracy, "momentum rule matched");
        }

        ScheduleRecommendation {
            focus_minutes: focus,
            break_minutes: brk,
            reason,
            context: RecommendationContext {
                recent_accuracy: percent(recent_accuracy / 100.0),
                activities_analyzed: window.len(),
                current_time_slot: Some(current_bucket),
                error: None,
            },
        }
    }

    /// Fetch from the log and run the cascade.
    ///
    /// Never fails: a log error yields the default recommendation with a
    /// diagnostic note in `context.error`.
    pub fn recommend(
        &self,
        log: &dyn ActivityLog,
        user_id: &str,
        subject: &str,
        now: DateTime<Utc>,
    ) -> ScheduleRecommendation {
        let fetched = log
            .recent(user_id, subject, None, self.config.recent_window)
            .and_then(|recent| Ok((recent, log.history(user_id, Some(subject))?)));

        match fetched {
            Ok((recent, history)) => self.evaluate(&recent, &history, self.peak.hour_of(now)),
            Err(e) => {
                tracing::warn!(user_id, subject, error = %e, "schedule fetch failed, using default");
                self.fallback("Could not calculate optimal settings")
            }
        }
    }
}
