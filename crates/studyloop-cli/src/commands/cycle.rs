//! Cycle command: judges the five most recent attempts.

use clap::Args;

use studyloop_core::cycle::CYCLE_LENGTH;
use studyloop_core::{ActivityLog, CycleAnalyzer, CycleScope, Difficulty};

use super::common::{load_config, print_json, CmdResult, LogArgs};

#[derive(Args)]
pub struct CycleArgs {
    #[command(flatten)]
    pub log: LogArgs,
    #[arg(long)]
    pub subject: String,
    /// Session topic, used when cycle.scope is "topic"
    #[arg(long)]
    pub topic: Option<String>,
    /// easy, medium or hard
    #[arg(long, default_value = "medium")]
    pub difficulty: String,
}

pub fn run(args: CycleArgs) -> CmdResult {
    let config = load_config()?;
    let log = args.log.open()?;

    let topic = match config.cycle.scope {
        CycleScope::Subject => None,
        CycleScope::Topic => args.topic.as_deref(),
    };
    let recent = log.recent(&args.log.user, &args.subject, topic, CYCLE_LENGTH as usize)?;
    let expected = Difficulty::parse_or_default(&args.difficulty).expected_secs(&config.difficulty);
    let summary = CycleAnalyzer::from_config(&config.cycle).analyze(&recent, expected);

    if args.log.json {
        return print_json(&summary);
    }

    println!("Last cycle for {} in {}", args.log.user, args.subject);
    if recent.len() < CYCLE_LENGTH as usize {
        println!("  (only {} attempts logged)", recent.len());
    }
    println!(
        "  Accuracy:    {}% ({} correct, {} wrong)",
        summary.accuracy_percent, summary.correct_count, summary.wrong_count
    );
    match summary.median_time {
        Some(median) => println!("  Median time: {median:.1}s (expected {expected:.0}s)"),
        None => println!("  Median time: n/a (expected {expected:.0}s)"),
    }
    println!("  Mastered:    {}", if summary.mastery_achieved { "yes" } else { "no" });
    println!("  Weakness:    {}", summary.weakness_tag);
    println!("  Next:        {}", summary.next_action);
    Ok(())
}
