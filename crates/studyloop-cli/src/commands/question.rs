//! Question command: what a session would serve after N attempts.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use serde_json::json;

use studyloop_core::{Difficulty, LearningSession, QuestionBank};

use super::common::{print_json, CmdResult};

#[derive(Args)]
pub struct QuestionArgs {
    /// JSON object mapping bank keys to question lists
    #[arg(long)]
    pub bank: PathBuf,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub subtopic: Option<String>,
    /// Attempts already made in the session
    #[arg(long, default_value_t = 0)]
    pub attempts: u32,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: QuestionArgs) -> CmdResult {
    let content = std::fs::read_to_string(&args.bank)
        .map_err(|e| format!("failed to read question bank {}: {e}", args.bank.display()))?;
    let bank: QuestionBank = serde_json::from_str(&content)?;

    let mut session = LearningSession::start(
        "cli",
        args.subject.as_str(),
        Some(args.topic.clone()),
        Difficulty::default(),
        Utc::now(),
    );
    if let Some(sub) = &args.subtopic {
        session = session.with_subtopic(sub.as_str());
    }
    session.attempt_count = args.attempts;

    let next = session.next_question(&bank)?;

    if args.json {
        return print_json(&json!({
            "question": next.question,
            "reasonCode": next.reason_code,
            "cycle": next.cycle,
        }));
    }

    println!("[{}] {}", next.question.question_id, next.question.prompt);
    for (i, option) in next.question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    println!(
        "\nReason: {}   Cycle {} question {}/{}",
        next.reason_code,
        next.cycle.index + 1,
        next.cycle.position,
        next.cycle.total
    );
    Ok(())
}
