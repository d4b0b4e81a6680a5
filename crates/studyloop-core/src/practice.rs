//! Practice submission flow.
//!
//! Ties the engines together for one answered question. The attempt is
//! logged, then confidence is recomputed over the recent window and the
//! mastery profile nudged under the profile lock. Every fifth attempt
//! also produces a cycle verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attempt::Attempt;
use crate::confidence::{ConfidenceEngine, ConfidenceScore};
use crate::config::Config;
use crate::cycle::{CycleAnalyzer, CycleScope, CycleState, CycleSummary, CYCLE_LENGTH};
use crate::error::{Result, StoreError};
use crate::mastery::MasteryProfile;
use crate::session::LearningSession;
use crate::store::{ActivityLog, InMemoryActivityLog, ProfileRegistry};

/// Profile values right after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub mastery_percentage: u8,
    pub confidence_score: f64,
}

/// Everything produced by one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    pub attempt: Attempt,
    /// Session attempt count after this attempt
    pub attempt_count: u32,
    pub confidence: ConfidenceScore,
    pub progress: ProgressSnapshot,
    /// Present when this attempt closed a cycle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleSummary>,
}

/// Runs attempt submissions against a log and a profile registry.
#[derive(Debug, Clone)]
pub struct PracticeCoordinator {
    config: Config,
    confidence: ConfidenceEngine,
    cycle: CycleAnalyzer,
}

impl Default for PracticeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeCoordinator {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.clone(),
            confidence: ConfidenceEngine::from_config(&config.confidence),
            cycle: CycleAnalyzer::from_config(&config.cycle),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Submit one answer for `session`.
    ///
    /// The profile for (user, subject) must already exist in `profiles`.
    /// The session counter only advances once the attempt is in the log.
    pub fn submit_attempt(
        &self,
        session: &mut LearningSession,
        profiles: &ProfileRegistry,
        log: &dyn ActivityLog,
        correct: bool,
        response_time_secs: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<AttemptOutcome> {
        let user_id = session.user_id.clone();
        let subject = session.subject.clone();
        if profiles.get(&user_id, &subject)?.is_none() {
            return Err(StoreError::ProfileNotFound { user_id, subject }.into());
        }

        let mut next = session.clone();
        let attempt = next.record_attempt(correct, response_time_secs, now, &self.config.difficulty)?;
        log.append(attempt.clone())?;
        *session = next;

        // Window is read under the profile lock: the last writer sees every
        // logged attempt.
        let topic = session.topic.clone();
        let (confidence, progress) = profiles.update(&user_id, &subject, |profile| {
            let window = log.recent(
                &user_id,
                &subject,
                topic.as_deref(),
                self.config.confidence.window,
            )?;
            let confidence = self.confidence.compute(&window);
            profile.record_attempt(correct);
            profile.set_confidence(&confidence);
            let progress = ProgressSnapshot {
                mastery_percentage: profile.mastery_percentage,
                confidence_score: profile.confidence_score,
            };
            Ok::<_, StoreError>((confidence, progress))
        })??;

        let cycle = if session.cycle_state() == CycleState::CycleComplete {
            let topic = match self.config.cycle.scope {
                CycleScope::Subject => None,
                CycleScope::Topic => session.topic.as_deref(),
            };
            let recent = log.recent(&user_id, &subject, topic, CYCLE_LENGTH as usize)?;
            let summary = self
                .cycle
                .analyze(&recent, session.expected_secs(&self.config.difficulty));
            tracing::info!(
                session = %session.id,
                attempts = session.attempt_count,
                mastered = summary.mastery_achieved,
                "cycle complete"
            );
            Some(summary)
        } else {
            None
        };

        Ok(AttemptOutcome {
            attempt,
            attempt_count: session.attempt_count,
            confidence,
            progress,
            cycle,
        })
    }

    /// Re-run recorded answers through a fresh session, oldest first.
    ///
    /// Only correctness and response time are taken from the records;
    /// records without an accuracy are skipped.
    pub fn replay(
        &self,
        attempts: &[Attempt],
        profile: MasteryProfile,
        mut session: LearningSession,
    ) -> Result<Vec<AttemptOutcome>> {
        let mut ordered: Vec<&Attempt> = attempts.iter().collect();
        ordered.sort_by_key(|a| a.timestamp);

        let profiles = ProfileRegistry::new();
        profiles.insert(profile)?;
        let log = InMemoryActivityLog::new();

        let mut outcomes = Vec::with_capacity(ordered.len());
        for attempt in ordered {
            if attempt.accuracy().is_none() {
                tracing::debug!(timestamp = %attempt.timestamp, "skipping attempt without accuracy");
                continue;
            }
            outcomes.push(self.submit_attempt(
                &mut session,
                &profiles,
                &log,
                attempt.is_correct(),
                attempt.response_time().map(|t| t.max(0.0)),
                attempt.timestamp,
            )?);
        }
        Ok(outcomes)
    }
}
