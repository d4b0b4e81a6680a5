//! Collaborator seams: the ordered attempt log and the profile registry.
//!
//! The engines never read storage themselves. Callers fetch the slices they
//! need through [`ActivityLog`] and persist results through
//! [`ProfileRegistry`] (or their own store).

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use crate::attempt::Attempt;
use crate::error::StoreError;
use crate::mastery::MasteryProfile;

/// Ordered store of practice attempts.
pub trait ActivityLog: Send + Sync {
    /// Most recent attempts first, at most `limit`.
    ///
    /// `topic = None` spans every topic of the subject.
    fn recent(
        &self,
        user_id: &str,
        subject: &str,
        topic: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Attempt>, StoreError>;

    /// Every attempt of a user, optionally limited to one subject.
    fn history(&self, user_id: &str, subject: Option<&str>) -> Result<Vec<Attempt>, StoreError>;

    /// Append one attempt.
    fn append(&self, attempt: Attempt) -> Result<(), StoreError>;
}

/// In-process attempt log.
///
/// Recency is by timestamp; attempts sharing a timestamp are ordered by
/// insertion, later insertions being more recent.
#[derive(Debug, Default)]
pub struct InMemoryActivityLog {
    attempts: RwLock<Vec<Attempt>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attempts(attempts: Vec<Attempt>) -> Self {
        Self {
            attempts: RwLock::new(attempts),
        }
    }

    /// Load a JSON array of attempt documents.
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let attempts: Vec<Attempt> = serde_json::from_str(json)?;
        tracing::debug!(count = attempts.len(), "loaded activity log");
        Ok(Self::from_attempts(attempts))
    }

    pub fn len(&self) -> usize {
        self.attempts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Unavailable("activity log lock poisoned".to_string())
    }
}

impl ActivityLog for InMemoryActivityLog {
    fn recent(
        &self,
        user_id: &str,
        subject: &str,
        topic: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Attempt>, StoreError> {
        let attempts = self.attempts.read().map_err(Self::poisoned)?;
        let mut scoped: Vec<(usize, &Attempt)> = attempts
            .iter()
            .enumerate()
            .filter(|(_, a)| a.in_scope(user_id, subject, topic))
            .collect();
        scoped.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
        Ok(scoped
            .into_iter()
            .take(limit)
            .map(|(_, a)| a.clone())
            .collect())
    }

    fn history(&self, user_id: &str, subject: Option<&str>) -> Result<Vec<Attempt>, StoreError> {
        let attempts = self.attempts.read().map_err(Self::poisoned)?;
        Ok(attempts
            .iter()
            .filter(|a| a.user_id == user_id && subject.map_or(true, |s| a.subject == s))
            .cloned()
            .collect())
    }

    fn append(&self, attempt: Attempt) -> Result<(), StoreError> {
        self.attempts.write().map_err(Self::poisoned)?.push(attempt);
        Ok(())
    }
}

/// Mastery profiles keyed by (user, subject).
///
/// [`ProfileRegistry::update`] holds the lock for the whole
/// read-modify-write, so concurrent attempt submissions for one profile
/// cannot lose an update.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: Mutex<HashMap<(String, String), MasteryProfile>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<(String, String), MasteryProfile>>, StoreError>
    {
        self.profiles
            .lock()
            .map_err(|_| StoreError::Unavailable("profile registry lock poisoned".to_string()))
    }

    /// Insert or replace a profile.
    pub fn insert(&self, profile: MasteryProfile) -> Result<(), StoreError> {
        let key = (profile.user_id.clone(), profile.subject.clone());
        self.lock()?.insert(key, profile);
        Ok(())
    }

    /// Snapshot of a profile.
    pub fn get(&self, user_id: &str, subject: &str) -> Result<Option<MasteryProfile>, StoreError> {
        Ok(self
            .lock()?
            .get(&(user_id.to_string(), subject.to_string()))
            .cloned())
    }

    /// All profiles of a user.
    pub fn for_user(&self, user_id: &str) -> Result<Vec<MasteryProfile>, StoreError> {
        let mut profiles: Vec<MasteryProfile> = self
            .lock()?
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        profiles.sort_by(|a, b| a.subject.cmp(&b.subject));
        Ok(profiles)
    }

    /// Run `f` against a profile under the registry lock.
    pub fn update<T>(
        &self,
        user_id: &str,
        subject: &str,
        f: impl FnOnce(&mut MasteryProfile) -> T,
    ) -> Result<T, StoreError> {
        let mut profiles = self.lock()?;
        let profile = profiles
            .get_mut(&(user_id.to_string(), subject.to_string()))
            .ok_or_else(|| StoreError::ProfileNotFound {
                user_id: user_id.to_string(),
                subject: subject.to_string(),
            })?;
        Ok(f(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn attempt(minute: i64, subject: &str, topic: &str, correct: bool) -> Attempt {
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        Attempt::new("u1", subject, correct, 30.0, 70.0, base + Duration::minutes(minute))
            .with_topic(topic)
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let log = InMemoryActivityLog::from_attempts(vec![
            attempt(0, "DSA", "Arrays", true),
            attempt(2, "DSA", "Trees", false),
            attempt(1, "DSA", "Arrays", false),
            attempt(3, "Math", "Algebra", true),
        ]);
        let recent = log.recent("u1", "DSA", None, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].topic.as_deref(), Some("Trees"));
        assert_eq!(recent[1].topic.as_deref(), Some("Arrays"));
        assert!(!recent[1].is_correct());

        let arrays = log.recent("u1", "DSA", Some("Arrays"), 10).unwrap();
        assert_eq!(arrays.len(), 2);
    }

    #[test]
    fn test_same_timestamp_orders_by_insertion() {
        let log = InMemoryActivityLog::new();
        log.append(attempt(0, "DSA", "Arrays", false)).unwrap();
        log.append(attempt(0, "DSA", "Arrays", true)).unwrap();
        let recent = log.recent("u1", "DSA", None, 1).unwrap();
        assert!(recent[0].is_correct());
    }

    #[test]
    fn test_history_filters_user_and_subject() {
        let mut other = attempt(0, "DSA", "Arrays", true);
        other.user_id = "u2".into();
        let log = InMemoryActivityLog::from_attempts(vec![
            attempt(0, "DSA", "Arrays", true),
            attempt(1, "Math", "Algebra", true),
            other,
        ]);
        assert_eq!(log.history("u1", None).unwrap().len(), 2);
        assert_eq!(log.history("u1", Some("DSA")).unwrap().len(), 1);
        assert_eq!(log.history("u2", Some("Math")).unwrap().len(), 0);
    }

    #[test]
    fn test_from_json_str() {
        let log = InMemoryActivityLog::from_json_str(
            r#"[{"userId":"u1","subject":"DSA","accuracy":1,"responseTime":20,"expectedSeconds":40,"timestamp":"2026-03-02T09:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(log.len(), 1);
        assert!(matches!(
            InMemoryActivityLog::from_json_str("{}"),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn test_update_missing_profile() {
        let registry = ProfileRegistry::new();
        let result = registry.update("u1", "DSA", |p| p.record_attempt(true));
        assert!(matches!(result, Err(StoreError::ProfileNotFound { .. })));
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let registry = Arc::new(ProfileRegistry::new());
        registry.insert(MasteryProfile::new("u1", "DSA", 0)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        registry
                            .update("u1", "DSA", |p| p.record_attempt(true))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let profile = registry.get("u1", "DSA").unwrap().unwrap();
        assert_eq!(profile.mastery_percentage, 80);
    }
}
