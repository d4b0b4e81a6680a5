//! Peak study time detection.
//!
//! Accuracy is aggregated per [`TimeBucket`] over a user's whole history;
//! the bucket with the best accuracy is the user's peak time.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::attempt::Attempt;
use crate::config::PeakTimeConfig;
use crate::stats::percent;
use crate::time_bucket::TimeBucket;

/// Accuracy of one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketAccuracy {
    pub bucket: TimeBucket,
    pub attempts: u64,
    pub correct: f64,
}

impl BucketAccuracy {
    fn new(bucket: TimeBucket) -> Self {
        Self {
            bucket,
            attempts: 0,
            correct: 0.0,
        }
    }

    /// correct / attempts, 0 when empty.
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.correct / self.attempts as f64
    }

    pub fn accuracy_percent(&self) -> u32 {
        percent(self.accuracy())
    }
}

/// Outcome of a peak-time query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakTimeReport {
    /// Enough history to judge
    pub ready: bool,
    /// Winning bucket; absent when not ready or no bucket has any accuracy
    pub bucket: Option<TimeBucket>,
    pub accuracy_percent: Option<u32>,
    pub attempts_analyzed: usize,
    /// Per-bucket breakdown in canonical order (empty when not ready)
    pub buckets: Vec<BucketAccuracy>,
}

impl PeakTimeReport {
    fn not_ready(attempts_analyzed: usize) -> Self {
        Self {
            ready: false,
            bucket: None,
            accuracy_percent: None,
            attempts_analyzed,
            buckets: Vec::new(),
        }
    }
}

/// Finds the time-of-day bucket with the highest historical accuracy.
#[derive(Debug, Clone)]
pub struct PeakTimeDetector {
    /// Minimum attempts before a peak is reported
    pub min_attempts: usize,
    /// Offset used to turn UTC timestamps into local hours
    pub offset: FixedOffset,
}

impl Default for PeakTimeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PeakTimeDetector {
    /// Detector requiring 15 attempts, reading hours in UTC.
    pub fn new() -> Self {
        Self::from_config(&PeakTimeConfig::default())
    }

    pub fn from_config(config: &PeakTimeConfig) -> Self {
        let offset = FixedOffset::east_opt(config.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| {
                tracing::warn!(
                    minutes = config.utc_offset_minutes,
                    "utc offset out of range, using UTC"
                );
                Utc.fix()
            });
        Self {
            min_attempts: config.min_attempts,
            offset,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Local hour of an instant.
    pub fn hour_of(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.offset).hour()
    }

    /// Bucket of an instant.
    pub fn bucket_of(&self, at: DateTime<Utc>) -> TimeBucket {
        TimeBucket::from_hour(self.hour_of(at))
    }

    /// Aggregate accuracy per bucket, canonical order.
    ///
    /// Attempts without a numeric accuracy are skipped.
    pub fn bucket_accuracies(&self, history: &[Attempt]) -> Vec<BucketAccuracy> {
        let mut buckets: Vec<BucketAccuracy> =
            TimeBucket::ALL.iter().copied().map(BucketAccuracy::new).collect();

        for attempt in history {
            let Some(accuracy) = attempt.accuracy() else {
                continue;
            };
            let slot = &mut buckets[self.bucket_of(attempt.timestamp).index()];
            slot.attempts += 1;
            slot.correct += accuracy;
        }
        buckets
    }

    /// Detect the peak bucket.
    ///
    /// Ties go to the bucket that comes first in [`TimeBucket::ALL`]; a
    /// bucket needs strictly positive accuracy to win.
    pub fn detect(&self, history: &[Attempt]) -> PeakTimeReport {
        let analyzed = history.iter().filter(|a| a.accuracy().is_some()).count();
        if analyzed < self.min_attempts {
            tracing::debug!(
                analyzed,
                required = self.min_attempts,
                "not enough history for peak time"
            );
            return PeakTimeReport::not_ready(analyzed);
        }

        let buckets = self.bucket_accuracies(history);

        let mut best: Option<&BucketAccuracy> = None;
        for candidate in buckets.iter().filter(|b| b.attempts > 0) {
            let best_accuracy = best.map_or(0.0, BucketAccuracy::accuracy);
            if candidate.accuracy() > best_accuracy {
                best = Some(candidate);
            }
        }

        let bucket = best.map(|b| b.bucket);
        let accuracy_percent = best.map(BucketAccuracy::accuracy_percent);
        tracing::debug!(?bucket, ?accuracy_percent, analyzed, "peak time detected");

        PeakTimeReport {
            ready: true,
            bucket,
            accuracy_percent,
            attempts_analyzed: analyzed,
            buckets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, correct: bool) -> Attempt {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, hour, 15, 0).unwrap();
        Attempt::new("u1", "DSA", correct, 30.0, 70.0, ts)
    }

    fn history(runs: &[(u32, bool, usize)]) -> Vec<Attempt> {
        runs.iter()
            .flat_map(|&(hour, correct, n)| std::iter::repeat_with(move || at(hour, correct)).take(n))
            .collect()
    }

    #[test]
    fn test_not_ready_below_threshold() {
        let report = PeakTimeDetector::new().detect(&history(&[(9, true, 14)]));
        assert!(!report.ready);
        assert_eq!(report.bucket, None);
        assert_eq!(report.attempts_analyzed, 14);
    }

    #[test]
    fn test_detects_best_bucket() {
        let h = history(&[
            (9, true, 4),
            (9, false, 4),
            (18, true, 6),
            (18, false, 1),
        ]);
        let report = PeakTimeDetector::new().detect(&h);
        assert!(report.ready);
        assert_eq!(report.bucket, Some(TimeBucket::Evening));
        assert_eq!(report.accuracy_percent, Some(86));
        assert_eq!(report.buckets.len(), 5);
        assert_eq!(report.buckets[0].attempts, 8);
    }

    #[test]
    fn test_tie_prefers_canonical_order() {
        // Night seen first in the input, Morning first canonically
        let h = history(&[(22, true, 8), (7, true, 8)]);
        let report = PeakTimeDetector::new().detect(&h);
        assert_eq!(report.bucket, Some(TimeBucket::Morning));
        assert_eq!(report.accuracy_percent, Some(100));
    }

    #[test]
    fn test_all_wrong_has_no_peak() {
        let report = PeakTimeDetector::new().detect(&history(&[(9, false, 20)]));
        assert!(report.ready);
        assert_eq!(report.bucket, None);
        assert_eq!(report.accuracy_percent, None);
    }

    #[test]
    fn test_records_without_accuracy_are_skipped() {
        let mut h = history(&[(9, true, 15)]);
        h[0].accuracy = None;
        let report = PeakTimeDetector::new().detect(&h);
        assert!(!report.ready);
        assert_eq!(report.attempts_analyzed, 14);
    }

    #[test]
    fn test_offset_shifts_hour() {
        // 03:15 UTC is Late Night in UTC but Morning at UTC+3
        let detector = PeakTimeDetector::from_config(&PeakTimeConfig {
            min_attempts: 15,
            utc_offset_minutes: 180,
        });
        let attempt = at(3, true);
        assert_eq!(detector.hour_of(attempt.timestamp), 6);
        assert_eq!(detector.bucket_of(attempt.timestamp), TimeBucket::Morning);
        assert_eq!(
            PeakTimeDetector::new().bucket_of(attempt.timestamp),
            TimeBucket::LateNight
        );
    }
}
