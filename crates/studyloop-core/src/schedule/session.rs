//! Timed focus sessions started from a recommendation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ScheduleReason, ScheduleRecommendation};
use crate::error::ValidationError;

/// A focus/break block the learner actually started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: Uuid,
    pub user_id: String,
    pub subject: String,
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub reason: ScheduleReason,
    pub cycles_completed: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl FocusSession {
    /// Start a session with the recommended durations.
    pub fn start(
        user_id: impl Into<String>,
        subject: impl Into<String>,
        recommendation: &ScheduleRecommendation,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            subject: subject.into(),
            focus_minutes: recommendation.focus_minutes,
            break_minutes: recommendation.break_minutes,
            reason: recommendation.reason,
            cycles_completed: 0,
            started_at: now,
            ended_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Count one finished focus/break cycle.
    pub fn complete_cycle(&mut self) -> Result<u32, ValidationError> {
        if !self.is_running() {
            return Err(ValidationError::AlreadyEnded(self.id));
        }
        self.cycles_completed += 1;
        Ok(self.cycles_completed)
    }

    /// End the session, returning its length in minutes.
    pub fn end(&mut self, now: DateTime<Utc>) -> Result<f64, ValidationError> {
        if !self.is_running() {
            return Err(ValidationError::AlreadyEnded(self.id));
        }
        if now < self.started_at {
            return Err(ValidationError::InvalidValue {
                field: "endedAt".to_string(),
                message: "session cannot end before it started".to_string(),
            });
        }
        self.ended_at = Some(now);
        Ok(self.duration_minutes().unwrap_or(0.0))
    }

    /// Minutes between start and end, once ended.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.ended_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 60_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleAdvisor;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_start_and_end() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let rec = ScheduleAdvisor::new().evaluate(&[], &[], 9);
        let mut session = FocusSession::start("u1", "DSA", &rec, now);
        assert!(session.is_running());
        assert_eq!(session.focus_minutes, 25);
        assert_eq!(session.reason, ScheduleReason::Default);

        assert_eq!(session.complete_cycle(), Ok(1));
        let minutes = session.end(now + Duration::seconds(90 * 60)).unwrap();
        assert_eq!(minutes, 90.0);
        assert!(!session.is_running());

        assert_eq!(
            session.end(now + Duration::hours(3)),
            Err(ValidationError::AlreadyEnded(session.id))
        );
        assert!(session.complete_cycle().is_err());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let rec = ScheduleAdvisor::new().evaluate(&[], &[], 9);
        let mut session = FocusSession::start("u1", "DSA", &rec, now);
        assert!(session.end(now - Duration::minutes(1)).is_err());
        assert!(session.is_running());
    }
}
