//! # Studyloop Core Library
//!
//! This library provides the analytics core of the studyloop adaptive
//! practice engine. Every engine is a pure, synchronous value computed over
//! attempts handed to it; the caller owns storage and transport, reaching
//! the log through the [`ActivityLog`] seam.
//!
//! ## Architecture
//!
//! - **Confidence**: accuracy blended with the median speed ratio over the
//!   most recent attempts
//! - **Cycles**: five-attempt mastery verdicts driven by the session counter
//! - **Schedule**: focus/break recommendations from a rule cascade over
//!   recent accuracy and the user's peak time of day
//! - **Practice**: the per-attempt flow that logs, scores and updates the
//!   mastery profile
//!
//! ## Key Components
//!
//! - [`ConfidenceEngine`]: confidence scoring
//! - [`CycleAnalyzer`]: cycle verdicts
//! - [`PeakTimeDetector`]: best time-of-day bucket
//! - [`ScheduleAdvisor`]: study schedule recommendations
//! - [`PracticeCoordinator`]: attempt submission flow
//! - [`Config`]: engine configuration

pub mod attempt;
pub mod confidence;
pub mod config;
pub mod cycle;
pub mod error;
pub mod mastery;
pub mod peak_time;
pub mod practice;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod store;
pub mod time_bucket;

pub use attempt::{Attempt, Difficulty};
pub use confidence::{ConfidenceEngine, ConfidenceScore, ZeroTimePolicy};
pub use config::Config;
pub use cycle::{CycleAnalyzer, CycleScope, CycleState, CycleSummary, NextAction, WeaknessTag};
pub use error::{ConfigError, CoreError, QuestionBankError, StoreError, ValidationError};
pub use mastery::{MasteryProfile, OverallLevel, RiskFlag};
pub use peak_time::{PeakTimeDetector, PeakTimeReport};
pub use practice::{AttemptOutcome, PracticeCoordinator, ProgressSnapshot};
pub use schedule::{FocusSession, ScheduleAdvisor, ScheduleReason, ScheduleRecommendation};
pub use session::{LearningSession, Question, QuestionBank, QuestionReason};
pub use store::{ActivityLog, InMemoryActivityLog, ProfileRegistry};
pub use time_bucket::TimeBucket;
