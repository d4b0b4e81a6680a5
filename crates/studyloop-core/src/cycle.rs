//! Five-attempt mastery cycles.
//!
//! Every fifth attempt of a learning session closes a cycle. The cycle
//! summary is read-only: it judges the last five attempts but never touches
//! the mastery profile, which is updated per attempt elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attempt::Attempt;
use crate::config::CycleConfig;
use crate::stats::{median, percent};

/// Attempts per cycle.
pub const CYCLE_LENGTH: u32 = 5;

/// Which attempts make up a cycle's "last five".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleScope {
    /// Every attempt in the subject, regardless of topic
    #[default]
    Subject,
    /// Only attempts in the session's topic
    Topic,
}

/// Position of an attempt counter relative to cycle boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    BelowCycle,
    CycleComplete,
}

impl CycleState {
    pub fn from_count(attempt_count: u32) -> Self {
        if attempt_count > 0 && attempt_count % CYCLE_LENGTH == 0 {
            CycleState::CycleComplete
        } else {
            CycleState::BelowCycle
        }
    }
}

/// Where the next question sits inside the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePosition {
    /// Zero-based cycle number
    pub index: u32,
    /// One-based position within the cycle
    pub position: u32,
    pub total: u32,
}

impl CyclePosition {
    pub fn from_count(attempt_count: u32) -> Self {
        Self {
            index: attempt_count / CYCLE_LENGTH,
            position: attempt_count % CYCLE_LENGTH + 1,
            total: CYCLE_LENGTH,
        }
    }
}

/// Dominant weakness of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaknessTag {
    LowAccuracy,
    SlowResponse,
    ModerateAccuracy,
    None,
}

impl WeaknessTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaknessTag::LowAccuracy => "low_accuracy",
            WeaknessTag::SlowResponse => "slow_response",
            WeaknessTag::ModerateAccuracy => "moderate_accuracy",
            WeaknessTag::None => "none",
        }
    }
}

impl fmt::Display for WeaknessTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the learner should do after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Continue,
    Remediate,
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextAction::Continue => f.write_str("continue"),
            NextAction::Remediate => f.write_str("remediate"),
        }
    }
}

/// Verdict over one completed cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    /// correct / 5
    pub accuracy: f64,
    pub accuracy_percent: u32,
    pub correct_count: u32,
    pub wrong_count: u32,
    /// `None` when no attempt in the cycle carries a response time
    pub median_time: Option<f64>,
    pub mastery_achieved: bool,
    pub weakness_tag: WeaknessTag,
    pub next_action: NextAction,
}

/// Judges a completed cycle.
#[derive(Debug, Clone)]
pub struct CycleAnalyzer {
    pub mastery_accuracy: f64,
    pub max_wrong: u32,
    pub low_accuracy: f64,
    pub slow_factor: f64,
}

impl Default for CycleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleAnalyzer {
    pub fn new() -> Self {
        Self::from_config(&CycleConfig::default())
    }

    pub fn from_config(config: &CycleConfig) -> Self {
        Self {
            mastery_accuracy: config.mastery_accuracy,
            max_wrong: config.max_wrong,
            low_accuracy: config.low_accuracy,
            slow_factor: config.slow_factor,
        }
    }

    /// Analyze the most recent cycle.
    ///
    /// `recent` is most-recent-first; only its first [`CYCLE_LENGTH`]
    /// entries are read. Accuracy is always taken over the full cycle
    /// length, so a short slice counts its missing attempts as wrong.
    /// Response times missing from a record are left out of the median.
    /// A cycle with no measured times cannot be mastered and is never
    /// tagged slow.
    pub fn analyze(&self, recent: &[Attempt], expected_secs: f64) -> CycleSummary {
        let cycle: Vec<&Attempt> = recent.iter().take(CYCLE_LENGTH as usize).collect();

        let correct_count = cycle.iter().filter(|a| a.is_correct()).count() as u32;
        let wrong_count = CYCLE_LENGTH - correct_count;
        let accuracy = f64::from(correct_count) / f64::from(CYCLE_LENGTH);

        let times: Vec<f64> = cycle.iter().filter_map(|a| a.response_time()).collect();
        let median_time = median(&times);

        let mastery_achieved = accuracy >= self.mastery_accuracy
            && wrong_count <= self.max_wrong
            && median_time.is_some_and(|t| t <= expected_secs);

        let weakness_tag = if accuracy < self.low_accuracy {
            WeaknessTag::LowAccuracy
        } else if median_time.is_some_and(|t| t > expected_secs * self.slow_factor) {
            WeaknessTag::SlowResponse
        } else if accuracy < self.mastery_accuracy {
            WeaknessTag::ModerateAccuracy
        } else {
            WeaknessTag::None
        };

        let next_action = if mastery_achieved || wrong_count <= self.max_wrong {
            NextAction::Continue
        } else {
            NextAction::Remediate
        };

        tracing::debug!(
            correct = correct_count,
            ?median_time,
            mastery_achieved,
            weakness = weakness_tag.as_str(),
            "cycle analyzed"
        );

        CycleSummary {
            accuracy,
            accuracy_percent: percent(accuracy),
            correct_count,
            wrong_count,
            median_time,
            mastery_achieved,
            weakness_tag,
            next_action,
        }
    }
}
