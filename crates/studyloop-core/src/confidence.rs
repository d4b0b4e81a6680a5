//! Confidence scoring over recent practice attempts.
//!
//! Confidence blends mean accuracy with the *median* speed ratio, so one
//! abandoned question left open for ten minutes cannot drag the speed
//! component down on its own.

use serde::{Deserialize, Serialize};

use crate::attempt::Attempt;
use crate::config::ConfidenceConfig;
use crate::stats::{clamp01, median, round2};

/// Score returned when no usable attempts exist.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// How a recorded response time of zero (or less) enters the speed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroTimePolicy {
    /// Treat the answer as exactly on time (ratio 1.0)
    #[default]
    OnTime,
    /// Keep the attempt for accuracy but leave it out of the speed median
    Exclude,
    /// Treat the answer as maximally slow (ratio 0.0)
    WorstCase,
}

/// Result of a confidence computation. All scores lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceScore {
    pub confidence: f64,
    pub accuracy_score: f64,
    pub speed_score: f64,
    pub attempts_used: usize,
}

impl ConfidenceScore {
    /// Cold-start prior.
    pub fn neutral() -> Self {
        Self {
            confidence: NEUTRAL_SCORE,
            accuracy_score: NEUTRAL_SCORE,
            speed_score: NEUTRAL_SCORE,
            attempts_used: 0,
        }
    }
}

impl Default for ConfidenceScore {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Reduces a window of attempts to accuracy, speed and confidence.
#[derive(Debug, Clone)]
pub struct ConfidenceEngine {
    pub accuracy_weight: f64,
    pub speed_weight: f64,
    pub zero_time_policy: ZeroTimePolicy,
}

impl Default for ConfidenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceEngine {
    /// Engine with the 70/30 accuracy/speed blend.
    pub fn new() -> Self {
        Self::from_config(&ConfidenceConfig::default())
    }

    pub fn from_config(config: &ConfidenceConfig) -> Self {
        Self {
            accuracy_weight: config.accuracy_weight,
            speed_weight: config.speed_weight,
            zero_time_policy: config.zero_time_policy,
        }
    }

    pub fn with_zero_time_policy(mut self, policy: ZeroTimePolicy) -> Self {
        self.zero_time_policy = policy;
        self
    }

    /// Speed ratio of one attempt, `None` when the policy excludes it.
    fn speed_ratio(&self, response_time: f64, expected: f64) -> Option<f64> {
        let effective = if response_time > 0.0 {
            response_time
        } else {
            match self.zero_time_policy {
                ZeroTimePolicy::OnTime => expected,
                ZeroTimePolicy::Exclude => return None,
                ZeroTimePolicy::WorstCase => return Some(0.0),
            }
        };
        Some(clamp01(expected / effective))
    }

    /// Compute confidence over an already-windowed list of attempts.
    ///
    /// Records missing accuracy, response time or expected seconds are
    /// dropped. When nothing remains the neutral prior is returned.
    pub fn compute(&self, attempts: &[Attempt]) -> ConfidenceScore {
        let mut accuracy_sum = 0.0;
        let mut used = 0usize;
        let mut ratios = Vec::with_capacity(attempts.len());

        for attempt in attempts {
            let (Some(accuracy), Some(response_time), Some(expected)) =
                (attempt.accuracy(), attempt.response_time(), attempt.expected())
            else {
                continue;
            };
            accuracy_sum += accuracy;
            used += 1;
            if let Some(ratio) = self.speed_ratio(response_time, expected) {
                ratios.push(ratio);
            }
        }

        if used < attempts.len() {
            tracing::warn!(
                dropped = attempts.len() - used,
                "ignoring attempts with missing numeric fields"
            );
        }
        if used == 0 {
            return ConfidenceScore::neutral();
        }

        let accuracy_score = clamp01(accuracy_sum / used as f64);
        let speed_score = median(&ratios).map_or(NEUTRAL_SCORE, clamp01);
        let confidence =
            clamp01(self.accuracy_weight * accuracy_score + self.speed_weight * speed_score);

        ConfidenceScore {
            confidence: round2(confidence),
            accuracy_score: round2(accuracy_score),
            speed_score: round2(speed_score),
            attempts_used: used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn attempts(correct: &[bool], times: &[f64], expected: f64) -> Vec<Attempt> {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        correct
            .iter()
            .zip(times)
            .map(|(&c, &t)| Attempt::new("u1", "DSA", c, t, expected, ts))
            .collect()
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let score = ConfidenceEngine::new().compute(&[]);
        assert_eq!(score, ConfidenceScore::neutral());
        assert_eq!(score.confidence, 0.5);
        assert_eq!(score.attempts_used, 0);
    }

    #[test]
    fn test_all_invalid_is_neutral() {
        let mut list = attempts(&[true, false], &[30.0, 40.0], 70.0);
        list[0].expected_secs = None;
        list[1].accuracy = None;
        let score = ConfidenceEngine::new().compute(&list);
        assert_eq!(score, ConfidenceScore::neutral());
    }

    #[test]
    fn test_mixed_ten_attempts() {
        let list = attempts(
            &[true, true, false, true, true, false, true, true, false, true],
            &[50.0, 65.0, 90.0, 100.0, 75.0, 120.0, 55.0, 70.0, 110.0, 60.0],
            70.0,
        );
        let score = ConfidenceEngine::new().compute(&list);
        assert_eq!(score.accuracy_score, 0.70);
        assert_eq!(score.speed_score, 0.97);
        assert_eq!(score.confidence, 0.78);
        assert_eq!(score.attempts_used, 10);
    }

    #[test]
    fn test_fast_and_accurate() {
        let list = attempts(&[true; 5], &[30.0, 35.0, 32.0, 28.0, 40.0], 70.0);
        let score = ConfidenceEngine::new().compute(&list);
        assert_eq!(score.speed_score, 1.0);
        assert_eq!(score.confidence, 1.0);
    }

    #[test]
    fn test_slow_and_struggling() {
        let list = attempts(
            &[false, true, false, false, false],
            &[150.0, 140.0, 120.0, 160.0, 130.0],
            70.0,
        );
        let score = ConfidenceEngine::new().compute(&list);
        assert_eq!(score.accuracy_score, 0.20);
        assert_eq!(score.speed_score, 0.50);
        assert_eq!(score.confidence, 0.29);
    }

    #[test]
    fn test_two_attempts_use_even_median() {
        let list = attempts(&[true, true], &[50.0, 60.0], 70.0);
        let score = ConfidenceEngine::new().compute(&list);
        assert_eq!(score.speed_score, 1.0);
        assert_eq!(score.confidence, 1.0);
    }

    #[test]
    fn test_single_outlier_does_not_drag_speed() {
        // 70 / 500 = 0.14 among on-time answers
        let list = attempts(&[true; 5], &[500.0, 70.0, 70.0, 70.0, 70.0], 70.0);
        let score = ConfidenceEngine::new().compute(&list);
        assert_eq!(score.speed_score, 1.0);
    }

    #[test]
    fn test_invalid_records_are_skipped_not_counted() {
        let mut list = attempts(&[true, false, true], &[70.0, 70.0, 70.0], 70.0);
        list[1].response_time_secs = None;
        let score = ConfidenceEngine::new().compute(&list);
        assert_eq!(score.attempts_used, 2);
        assert_eq!(score.accuracy_score, 1.0);
    }

    #[test]
    fn test_zero_time_on_time_policy() {
        let list = attempts(&[false, false], &[0.0, 140.0], 70.0);
        let score = ConfidenceEngine::new().compute(&list);
        // ratios 1.0 and 0.5
        assert_eq!(score.speed_score, 0.75);
    }

    #[test]
    fn test_zero_time_exclude_policy() {
        let list = attempts(&[false, false], &[0.0, 140.0], 70.0);
        let engine = ConfidenceEngine::new().with_zero_time_policy(ZeroTimePolicy::Exclude);
        let score = engine.compute(&list);
        assert_eq!(score.speed_score, 0.5);
        assert_eq!(score.attempts_used, 2);

        let only_zero = attempts(&[true], &[0.0], 70.0);
        let score = engine.compute(&only_zero);
        assert_eq!(score.speed_score, NEUTRAL_SCORE);
        assert_eq!(score.accuracy_score, 1.0);
        assert_eq!(score.confidence, 0.85);
    }

    #[test]
    fn test_zero_time_worst_case_policy() {
        let list = attempts(&[true, true], &[0.0, 0.0], 70.0);
        let engine = ConfidenceEngine::new().with_zero_time_policy(ZeroTimePolicy::WorstCase);
        let score = engine.compute(&list);
        assert_eq!(score.speed_score, 0.0);
        assert_eq!(score.confidence, 0.7);
    }
}
