//! Mastery profiles and diagnostics.
//!
//! A profile is created once per (user, subject) from the subject-level
//! diagnostic and then nudged after every attempt.

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceScore;
use crate::stats::{clamp01, round2};

/// Mastery gained per correct attempt.
pub const CORRECT_GAIN: u8 = 2;
/// Mastery lost per incorrect attempt.
pub const INCORRECT_PENALTY: u8 = 1;
/// Profiles below this confidence are flagged at risk.
pub const RISK_CONFIDENCE: f64 = 0.4;
/// Profiles below this mastery percentage are flagged at risk.
pub const RISK_MASTERY: u8 = 40;

/// Coarse level assigned by the subject diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl OverallLevel {
    /// Beginner up to 70%, Intermediate above 70%, Advanced above 90%.
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage > 90 {
            OverallLevel::Advanced
        } else if percentage > 70 {
            OverallLevel::Intermediate
        } else {
            OverallLevel::Beginner
        }
    }
}

/// Entry level suggested by a subtopic mini-diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryLevel {
    Basic,
    Advanced,
}

/// Per-(user, subject) mastery record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryProfile {
    pub user_id: String,
    pub subject: String,
    pub overall_level: OverallLevel,
    /// 0-100
    pub mastery_percentage: u8,
    /// 0-1, two decimals
    pub confidence_score: f64,
    #[serde(default)]
    pub weak_concepts: Vec<String>,
    #[serde(default)]
    pub strong_concepts: Vec<String>,
    #[serde(default = "default_learning_speed")]
    pub learning_speed: String,
}

fn default_learning_speed() -> String {
    "medium".to_string()
}

/// Subject flagged by [`MasteryProfile::risk_flag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub subject: String,
    pub reason: String,
}

impl MasteryProfile {
    /// Profile with an explicit starting mastery.
    pub fn new(user_id: impl Into<String>, subject: impl Into<String>, mastery_percentage: u8) -> Self {
        let mastery_percentage = mastery_percentage.min(100);
        Self {
            user_id: user_id.into(),
            subject: subject.into(),
            overall_level: OverallLevel::from_percentage(mastery_percentage),
            mastery_percentage,
            confidence_score: round2(clamp01(f64::from(mastery_percentage) / 100.0)),
            weak_concepts: Vec::new(),
            strong_concepts: Vec::new(),
            learning_speed: default_learning_speed(),
        }
    }

    /// Create a profile from the answers of a subject-level diagnostic.
    ///
    /// An empty answer sheet scores 0%.
    pub fn from_diagnostic(
        user_id: impl Into<String>,
        subject: impl Into<String>,
        answers: &[bool],
    ) -> Self {
        let correct = answers.iter().filter(|&&a| a).count();
        let percentage = if answers.is_empty() {
            0
        } else {
            ((correct as f64 / answers.len() as f64) * 100.0).round() as u8
        };
        Self::new(user_id, subject, percentage)
    }

    /// Apply one attempt: +2 when correct (capped at 100), -1 otherwise
    /// (floored at 0). Returns the new percentage.
    pub fn record_attempt(&mut self, correct: bool) -> u8 {
        self.mastery_percentage = if correct {
            self.mastery_percentage.saturating_add(CORRECT_GAIN).min(100)
        } else {
            self.mastery_percentage.saturating_sub(INCORRECT_PENALTY)
        };
        self.mastery_percentage
    }

    /// Store a freshly computed confidence.
    pub fn set_confidence(&mut self, score: &ConfidenceScore) {
        self.confidence_score = round2(clamp01(score.confidence));
    }

    /// Flag the subject when confidence or mastery is low.
    pub fn risk_flag(&self) -> Option<RiskFlag> {
        (self.confidence_score < RISK_CONFIDENCE || self.mastery_percentage < RISK_MASTERY).then(
            || RiskFlag {
                subject: self.subject.clone(),
                reason: "Low confidence or mastery".to_string(),
            },
        )
    }
}

/// Entry level from a subtopic diagnostic: advanced when at least half the
/// answers (rounded up) are correct.
pub fn subtopic_entry_level(answers: &[bool]) -> EntryLevel {
    let correct = answers.iter().filter(|&&a| a).count();
    if correct >= answers.len().div_ceil(2) {
        EntryLevel::Advanced
    } else {
        EntryLevel::Basic
    }
}

/// Risk flags across a user's profiles.
pub fn risk_flags(profiles: &[MasteryProfile]) -> Vec<RiskFlag> {
    profiles.iter().filter_map(MasteryProfile::risk_flag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_diagnostic_levels() {
        let p = MasteryProfile::from_diagnostic("u1", "DSA", &[true, true, false, false]);
        assert_eq!(p.mastery_percentage, 50);
        assert_eq!(p.overall_level, OverallLevel::Beginner);
        assert_eq!(p.confidence_score, 0.5);

        let p = MasteryProfile::from_diagnostic("u1", "DSA", &[true, true, true, true, false]);
        assert_eq!(p.mastery_percentage, 80);
        assert_eq!(p.overall_level, OverallLevel::Intermediate);

        let p = MasteryProfile::from_diagnostic("u1", "DSA", &[true; 10]);
        assert_eq!(p.overall_level, OverallLevel::Advanced);
        assert_eq!(p.confidence_score, 1.0);
    }

    #[test]
    fn test_level_boundaries_are_exclusive() {
        assert_eq!(OverallLevel::from_percentage(70), OverallLevel::Beginner);
        assert_eq!(OverallLevel::from_percentage(71), OverallLevel::Intermediate);
        assert_eq!(OverallLevel::from_percentage(90), OverallLevel::Intermediate);
        assert_eq!(OverallLevel::from_percentage(91), OverallLevel::Advanced);
    }

    #[test]
    fn test_empty_diagnostic_scores_zero() {
        let p = MasteryProfile::from_diagnostic("u1", "DSA", &[]);
        assert_eq!(p.mastery_percentage, 0);
    }

    #[test]
    fn test_record_attempt_clamps() {
        let mut p = MasteryProfile::new("u1", "DSA", 99);
        assert_eq!(p.record_attempt(true), 100);
        assert_eq!(p.record_attempt(true), 100);

        let mut p = MasteryProfile::new("u1", "DSA", 0);
        assert_eq!(p.record_attempt(false), 0);
        assert_eq!(p.record_attempt(true), 2);
        assert_eq!(p.record_attempt(false), 1);
    }

    #[test]
    fn test_risk_flag() {
        let mut p = MasteryProfile::new("u1", "DSA", 60);
        assert!(p.risk_flag().is_none());

        p.confidence_score = 0.39;
        assert_eq!(p.risk_flag().unwrap().subject, "DSA");

        let low_mastery = MasteryProfile::new("u1", "Math", 39);
        let flags = risk_flags(&[MasteryProfile::new("u1", "DSA", 80), low_mastery]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].subject, "Math");
    }

    #[test]
    fn test_subtopic_entry_level() {
        assert_eq!(subtopic_entry_level(&[true, false, false]), EntryLevel::Basic);
        assert_eq!(subtopic_entry_level(&[true, true, false]), EntryLevel::Advanced);
        assert_eq!(subtopic_entry_level(&[true, false]), EntryLevel::Advanced);
        assert_eq!(subtopic_entry_level(&[]), EntryLevel::Advanced);
    }

    proptest! {
        #[test]
        fn mastery_never_leaves_bounds(
            start in 0u8..=100,
            answers in proptest::collection::vec(any::<bool>(), 0..500),
        ) {
            let mut p = MasteryProfile::new("u1", "DSA", start);
            for correct in answers {
                let m = p.record_attempt(correct);
                prop_assert!(m <= 100);
            }
        }
    }
}
