//! Learning sessions.
//!
//! A session counts the attempts made in one sitting on a subject/topic.
//! The counter drives question selection and closes a mastery cycle every
//! [`CYCLE_LENGTH`](crate::cycle::CYCLE_LENGTH) attempts.

mod questions;

pub use questions::{slugify, Question, QuestionBank, QuestionReason};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attempt::{Attempt, Difficulty};
use crate::config::DifficultyConfig;
use crate::cycle::{CyclePosition, CycleState};
use crate::error::{Result, ValidationError};

/// Lifecycle status of a learning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// Question served by [`LearningSession::next_question`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestion<'a> {
    pub question: &'a Question,
    pub reason_code: QuestionReason,
    pub cycle: CyclePosition,
}

/// One learning session on a subject/topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSession {
    pub id: Uuid,
    pub user_id: String,
    pub subject: String,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Difficulty,
    pub attempt_count: u32,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
}

impl LearningSession {
    /// Start an active session.
    pub fn start(
        user_id: impl Into<String>,
        subject: impl Into<String>,
        topic: Option<String>,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            subject: subject.into(),
            topic,
            subtopic: None,
            difficulty,
            attempt_count: 0,
            status: SessionStatus::Active,
            started_at: now,
        }
    }

    pub fn with_subtopic(mut self, subtopic: impl Into<String>) -> Self {
        self.subtopic = Some(subtopic.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn cycle_state(&self) -> CycleState {
        CycleState::from_count(self.attempt_count)
    }

    pub fn cycle_position(&self) -> CyclePosition {
        CyclePosition::from_count(self.attempt_count)
    }

    /// Expected answer time at the session's difficulty.
    pub fn expected_secs(&self, config: &DifficultyConfig) -> f64 {
        self.difficulty.expected_secs(config)
    }

    fn ensure_active(&self) -> Result<()> {
        if !self.is_active() {
            return Err(ValidationError::SessionNotActive(self.id).into());
        }
        Ok(())
    }

    fn topic(&self) -> Result<&str> {
        self.topic
            .as_deref()
            .ok_or_else(|| ValidationError::MissingTopic(self.id).into())
    }

    /// Pick the next question from the bank.
    pub fn next_question<'a>(&self, bank: &'a QuestionBank) -> Result<NextQuestion<'a>> {
        self.ensure_active()?;
        let topic = self.topic()?;
        let question = bank.select(
            &self.subject,
            topic,
            self.subtopic.as_deref(),
            self.attempt_count,
        )?;
        Ok(NextQuestion {
            question,
            reason_code: QuestionReason::from_attempt_count(self.attempt_count),
            cycle: self.cycle_position(),
        })
    }

    /// Count one answered question and return the attempt record to log.
    ///
    /// A missing response time is logged as zero.
    pub fn record_attempt(
        &mut self,
        correct: bool,
        response_time_secs: Option<f64>,
        at: DateTime<Utc>,
        config: &DifficultyConfig,
    ) -> Result<Attempt> {
        self.ensure_active()?;
        let topic = self.topic()?.to_string();
        if let Some(t) = response_time_secs {
            if !t.is_finite() || t < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: "responseTime".to_string(),
                    message: format!("expected a non-negative number of seconds, got {t}"),
                }
                .into());
            }
        }

        let mut attempt = Attempt::new(
            self.user_id.clone(),
            self.subject.clone(),
            correct,
            response_time_secs.unwrap_or(0.0),
            self.expected_secs(config),
            at,
        )
        .with_topic(topic)
        .with_session(self.id);
        attempt.subtopic = self.subtopic.clone();

        self.attempt_count += 1;
        Ok(attempt)
    }

    /// Mark the session completed.
    pub fn end(&mut self) {
        self.status = SessionStatus::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn session() -> LearningSession {
        LearningSession::start("u1", "DSA", Some("Arrays".into()), Difficulty::Medium, now())
    }

    fn bank() -> QuestionBank {
        let mut bank = QuestionBank::new();
        let questions = (1..=3)
            .map(|i| Question {
                question_id: format!("arr-{i}"),
                prompt: String::new(),
                options: vec![],
                correct_index: 0,
                difficulty: Difficulty::Medium,
            })
            .collect();
        bank.insert("DSA", "Arrays", None, questions);
        bank
    }

    #[test]
    fn test_record_attempt_builds_log_entry() {
        let mut s = session().with_subtopic("Two Pointers");
        let config = DifficultyConfig::default();
        let attempt = s.record_attempt(true, Some(42.0), now(), &config).unwrap();
        assert_eq!(s.attempt_count, 1);
        assert_eq!(attempt.expected_secs, Some(70.0));
        assert_eq!(attempt.topic.as_deref(), Some("Arrays"));
        assert_eq!(attempt.subtopic.as_deref(), Some("Two Pointers"));
        assert_eq!(attempt.session_id, Some(s.id));
        assert!(attempt.is_correct());
    }

    #[test]
    fn test_missing_response_time_is_logged_as_zero() {
        let mut s = session();
        let attempt = s
            .record_attempt(false, None, now(), &DifficultyConfig::default())
            .unwrap();
        assert_eq!(attempt.response_time_secs, Some(0.0));
    }

    #[test]
    fn test_negative_response_time_is_rejected() {
        let mut s = session();
        let result = s.record_attempt(true, Some(-3.0), now(), &DifficultyConfig::default());
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(s.attempt_count, 0);
    }

    #[test]
    fn test_cycle_completes_every_fifth_attempt() {
        let mut s = session();
        let config = DifficultyConfig::default();
        let mut completions = Vec::new();
        for _ in 0..12 {
            s.record_attempt(true, Some(30.0), now(), &config).unwrap();
            if s.cycle_state() == CycleState::CycleComplete {
                completions.push(s.attempt_count);
            }
        }
        assert_eq!(completions, vec![5, 10]);
    }

    #[test]
    fn test_next_question_follows_attempt_count() {
        let mut s = session();
        let bank = bank();
        let config = DifficultyConfig::default();

        let first = s.next_question(&bank).unwrap();
        assert_eq!(first.question.question_id, "arr-1");
        assert_eq!(first.reason_code, QuestionReason::BaselineCheck);
        assert_eq!(first.cycle.position, 1);

        for _ in 0..4 {
            s.record_attempt(true, Some(30.0), now(), &config).unwrap();
        }
        let fifth = s.next_question(&bank).unwrap();
        assert_eq!(fifth.question.question_id, "arr-2");
        assert_eq!(fifth.reason_code, QuestionReason::SlowResponse);
        assert_eq!(fifth.cycle.position, 5);
        assert_eq!(fifth.cycle.index, 0);
    }

    #[test]
    fn test_completed_session_rejects_work() {
        let mut s = session();
        s.end();
        let config = DifficultyConfig::default();
        assert!(matches!(
            s.record_attempt(true, Some(10.0), now(), &config),
            Err(CoreError::Validation(ValidationError::SessionNotActive(_)))
        ));
        assert!(s.next_question(&bank()).is_err());
    }

    #[test]
    fn test_session_without_topic_rejects_work() {
        let mut s = LearningSession::start("u1", "DSA", None, Difficulty::Easy, now());
        assert!(matches!(
            s.next_question(&bank()),
            Err(CoreError::Validation(ValidationError::MissingTopic(_)))
        ));
        assert!(s
            .record_attempt(true, Some(10.0), now(), &DifficultyConfig::default())
            .is_err());
    }
}
