//! Question bank and round-robin selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::attempt::Difficulty;
use crate::error::QuestionBankError;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Why a question was served at this point of the session.
///
/// Chosen from the raw attempt count only, not from measured performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionReason {
    BaselineCheck,
    FluencyDrill,
    EdgeCaseCheck,
    SlowResponse,
}

impl QuestionReason {
    pub fn from_attempt_count(attempt_count: u32) -> Self {
        match attempt_count {
            0 | 1 => QuestionReason::BaselineCheck,
            2 => QuestionReason::FluencyDrill,
            3 => QuestionReason::EdgeCaseCheck,
            _ => QuestionReason::SlowResponse,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionReason::BaselineCheck => "baseline_check",
            QuestionReason::FluencyDrill => "fluency_drill",
            QuestionReason::EdgeCaseCheck => "edge_case_check",
            QuestionReason::SlowResponse => "slow_response",
        }
    }
}

impl fmt::Display for QuestionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-case, trim, collapse whitespace to `-`, drop anything outside
/// `[a-z0-9-]`. "Linked List" becomes "linked-list".
pub fn slugify(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Fixed question lists keyed by `subject-topic[-subtopic]` slugs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    entries: HashMap<String, Vec<Question>>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register questions under a subject/topic/subtopic path.
    pub fn insert(
        &mut self,
        subject: &str,
        topic: &str,
        subtopic: Option<&str>,
        questions: Vec<Question>,
    ) {
        let key = match subtopic {
            Some(sub) => format!("{}-{}-{}", slugify(subject), slugify(topic), slugify(sub)),
            None => format!("{}-{}", slugify(subject), slugify(topic)),
        };
        self.entries.insert(key, questions);
    }

    /// Questions for a path, trying the subtopic key before the topic key.
    pub fn lookup(
        &self,
        subject: &str,
        topic: &str,
        subtopic: Option<&str>,
    ) -> Result<&[Question], QuestionBankError> {
        let base_key = format!("{}-{}", slugify(subject), slugify(topic));
        let sub_key = subtopic.map(|s| format!("{base_key}-{}", slugify(s)));

        let found = sub_key
            .as_ref()
            .and_then(|k| self.entries.get(k))
            .filter(|qs| !qs.is_empty())
            .or_else(|| self.entries.get(&base_key).filter(|qs| !qs.is_empty()));

        found.map(Vec::as_slice).ok_or_else(|| QuestionBankError::NoQuestions {
            key: match sub_key {
                Some(sub) => format!("{base_key} or {sub}"),
                None => base_key,
            },
        })
    }

    /// Round-robin pick: `attempt_count mod len`.
    pub fn select(
        &self,
        subject: &str,
        topic: &str,
        subtopic: Option<&str>,
        attempt_count: u32,
    ) -> Result<&Question, QuestionBankError> {
        let questions = self.lookup(subject, topic, subtopic)?;
        Ok(&questions[attempt_count as usize % questions.len()])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str) -> Question {
        Question {
            question_id: id.to_string(),
            prompt: format!("prompt {id}"),
            options: vec!["a".into(), "b".into()],
            correct_index: 0,
            difficulty: Difficulty::Easy,
        }
    }

    fn bank() -> QuestionBank {
        let mut bank = QuestionBank::new();
        bank.insert("DSA", "Arrays", None, vec![q("arr-1"), q("arr-2"), q("arr-3")]);
        bank.insert("DSA", "Linked List", Some("Doubly Linked"), vec![q("dll-1")]);
        bank
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Trees"), "trees");
        assert_eq!(slugify("  Linked   List "), "linked-list");
        assert_eq!(slugify("C++ & Pointers"), "c--pointers");
    }

    #[test]
    fn test_round_robin_wraps() {
        let bank = bank();
        let ids: Vec<_> = (0..5)
            .map(|n| bank.select("DSA", "Arrays", None, n).unwrap().question_id.clone())
            .collect();
        assert_eq!(ids, vec!["arr-1", "arr-2", "arr-3", "arr-1", "arr-2"]);
    }

    #[test]
    fn test_subtopic_falls_back_to_topic() {
        let bank = bank();
        let picked = bank.select("dsa", "arrays", Some("Two Pointers"), 0).unwrap();
        assert_eq!(picked.question_id, "arr-1");

        let picked = bank.select("DSA", "Linked List", Some("Doubly Linked"), 4).unwrap();
        assert_eq!(picked.question_id, "dll-1");
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let err = bank().select("DSA", "Graphs", Some("BFS"), 0).unwrap_err();
        assert_eq!(
            err,
            QuestionBankError::NoQuestions {
                key: "dsa-graphs or dsa-graphs-bfs".to_string()
            }
        );
    }

    #[test]
    fn test_reason_progression() {
        let reasons: Vec<_> = (0..6).map(QuestionReason::from_attempt_count).collect();
        assert_eq!(
            reasons,
            vec![
                QuestionReason::BaselineCheck,
                QuestionReason::BaselineCheck,
                QuestionReason::FluencyDrill,
                QuestionReason::EdgeCaseCheck,
                QuestionReason::SlowResponse,
                QuestionReason::SlowResponse,
            ]
        );
    }

    #[test]
    fn test_bank_deserializes_from_keyed_json() {
        let json = r#"{
            "dsa-trees": [
                {"questionId": "t1", "prompt": "?", "options": ["x"], "correctIndex": 0, "difficulty": "hard"}
            ]
        }"#;
        let bank: QuestionBank = serde_json::from_str(json).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.select("DSA", "Trees", None, 9).unwrap().difficulty, Difficulty::Hard);
    }
}
