//! Replay command: runs logged attempts through a fresh practice session.

use chrono::Utc;
use clap::Args;

use studyloop_core::{
    ActivityLog, Difficulty, LearningSession, MasteryProfile, PracticeCoordinator,
};

use super::common::{load_config, print_json, rule, CmdResult, LogArgs};

#[derive(Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub log: LogArgs,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub topic: String,
    /// easy, medium or hard
    #[arg(long, default_value = "medium")]
    pub difficulty: String,
    /// Starting mastery percentage
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub mastery: u8,
}

pub fn run(args: ReplayArgs) -> CmdResult {
    let config = load_config()?;
    let log = args.log.open()?;
    let user = &args.log.user;

    let attempts = log.recent(user, &args.subject, Some(&args.topic), usize::MAX)?;
    let difficulty = Difficulty::parse_or_default(&args.difficulty);
    let started_at = attempts.last().map_or_else(Utc::now, |a| a.timestamp);
    let session = LearningSession::start(
        user.as_str(),
        args.subject.as_str(),
        Some(args.topic.clone()),
        difficulty,
        started_at,
    );
    let profile = MasteryProfile::new(user.as_str(), args.subject.as_str(), args.mastery);

    let coordinator = PracticeCoordinator::from_config(&config);
    let outcomes = coordinator.replay(&attempts, profile, session)?;

    if args.log.json {
        return print_json(&outcomes);
    }

    println!("Replay of {user} in {} / {} ({difficulty})", args.subject, args.topic);
    println!("{}", rule());
    for outcome in &outcomes {
        println!(
            "#{:<3} {} {:>6.1}s  mastery {:>3}%  confidence {:.2}",
            outcome.attempt_count,
            if outcome.attempt.is_correct() { "correct" } else { "wrong  " },
            outcome.attempt.response_time().unwrap_or(0.0),
            outcome.progress.mastery_percentage,
            outcome.confidence.confidence,
        );
        if let Some(cycle) = &outcome.cycle {
            println!(
                "     cycle: {}% accuracy, median {}, mastered {}, weakness {}, next {}",
                cycle.accuracy_percent,
                cycle.median_time.map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}s")),
                if cycle.mastery_achieved { "yes" } else { "no" },
                cycle.weakness_tag,
                cycle.next_action,
            );
        }
    }
    println!("{}", rule());
    match outcomes.last() {
        Some(last) => println!(
            "{} attempts replayed, final mastery {}%",
            outcomes.len(),
            last.progress.mastery_percentage
        ),
        None => println!("No attempts to replay."),
    }
    Ok(())
}
