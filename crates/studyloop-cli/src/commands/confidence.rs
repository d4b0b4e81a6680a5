//! Confidence command.

use clap::Args;

use studyloop_core::{ActivityLog, ConfidenceEngine};

use super::common::{load_config, print_json, CmdResult, LogArgs};

#[derive(Args)]
pub struct ConfidenceArgs {
    #[command(flatten)]
    pub log: LogArgs,
    #[arg(long)]
    pub subject: String,
    /// Restrict to one topic
    #[arg(long)]
    pub topic: Option<String>,
    /// Number of most recent attempts (defaults to confidence.window)
    #[arg(long)]
    pub window: Option<usize>,
}

pub fn run(args: ConfidenceArgs) -> CmdResult {
    let config = load_config()?;
    let log = args.log.open()?;
    let window = args.window.unwrap_or(config.confidence.window);

    let recent = log.recent(&args.log.user, &args.subject, args.topic.as_deref(), window)?;
    let score = ConfidenceEngine::from_config(&config.confidence).compute(&recent);

    if args.log.json {
        return print_json(&score);
    }

    println!("Confidence for {} in {}", args.log.user, args.subject);
    if let Some(topic) = &args.topic {
        println!("  Topic:       {topic}");
    }
    println!("  Confidence:  {:.2}", score.confidence);
    println!("  Accuracy:    {:.2}", score.accuracy_score);
    println!("  Speed:       {:.2}", score.speed_score);
    println!("  Attempts:    {} of {} requested", score.attempts_used, window);
    if score.attempts_used == 0 {
        println!("\n  No usable attempts yet; showing the neutral prior.");
    }
    Ok(())
}
