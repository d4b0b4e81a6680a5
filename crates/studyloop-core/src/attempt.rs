//! Practice attempt records and difficulty levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::config::DifficultyConfig;

/// One answered question, as stored in the attempt log.
///
/// Numeric fields are optional: a record missing any of them is still a
/// valid log entry but is dropped by the engines that need the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub user_id: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    /// 1 for correct, 0 for incorrect
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Seconds taken to answer
    #[serde(default, rename = "responseTime")]
    pub response_time_secs: Option<f64>,
    /// Seconds expected at the question's difficulty
    #[serde(default, rename = "expectedSeconds")]
    pub expected_secs: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
}

impl Attempt {
    /// Build a complete attempt record.
    pub fn new(
        user_id: impl Into<String>,
        subject: impl Into<String>,
        correct: bool,
        response_time_secs: f64,
        expected_secs: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            subject: subject.into(),
            topic: None,
            subtopic: None,
            accuracy: Some(if correct { 1.0 } else { 0.0 }),
            response_time_secs: Some(response_time_secs),
            expected_secs: Some(expected_secs),
            timestamp,
            session_id: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_subtopic(mut self, subtopic: impl Into<String>) -> Self {
        self.subtopic = Some(subtopic.into());
        self
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Accuracy if present and finite.
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy.filter(|v| v.is_finite())
    }

    /// Response time if present and finite.
    pub fn response_time(&self) -> Option<f64> {
        self.response_time_secs.filter(|v| v.is_finite())
    }

    /// Expected seconds if present and finite.
    pub fn expected(&self) -> Option<f64> {
        self.expected_secs.filter(|v| v.is_finite())
    }

    /// Whether the answer was marked correct.
    pub fn is_correct(&self) -> bool {
        self.accuracy() == Some(1.0)
    }

    /// Whether every numeric field needed for scoring is present.
    pub fn is_scorable(&self) -> bool {
        self.accuracy().is_some() && self.response_time().is_some() && self.expected().is_some()
    }

    /// Whether this attempt belongs to the given scope.
    ///
    /// `topic = None` matches every topic of the subject.
    pub fn in_scope(&self, user_id: &str, subject: &str, topic: Option<&str>) -> bool {
        self.user_id == user_id
            && self.subject == subject
            && topic.map_or(true, |t| self.topic.as_deref() == Some(t))
    }
}

/// Question difficulty of a learning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse: unknown labels fall back to medium.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Expected answer time for this difficulty.
    pub fn expected_secs(&self, config: &DifficultyConfig) -> f64 {
        match self {
            Difficulty::Easy => config.easy_secs,
            Difficulty::Medium => config.medium_secs,
            Difficulty::Hard => config.hard_secs,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: '{other}'")),
        }
    }
}
