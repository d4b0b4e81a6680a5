//! Peak time command for displaying time-of-day performance.

use clap::Args;

use studyloop_core::{ActivityLog, PeakTimeDetector};

use super::common::{load_config, print_json, rule, utc_offset, CmdResult, LogArgs};

#[derive(Args)]
pub struct PeakArgs {
    #[command(flatten)]
    pub log: LogArgs,
    /// Limit to one subject (all subjects when omitted)
    #[arg(long)]
    pub subject: Option<String>,
    /// Minutes east of UTC (defaults to the local offset)
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

pub fn run(args: PeakArgs) -> CmdResult {
    let config = load_config()?;
    let log = args.log.open()?;
    let history = log.history(&args.log.user, args.subject.as_deref())?;

    let detector =
        PeakTimeDetector::from_config(&config.peak_time).with_offset(utc_offset(args.utc_offset)?);
    let report = detector.detect(&history);

    if args.log.json {
        return print_json(&report);
    }

    println!("\nPeak Study Time\n");
    println!("{}", rule());

    if !report.ready {
        println!(
            "\nNot enough history yet: {} of {} attempts.",
            report.attempts_analyzed, detector.min_attempts
        );
        println!("\n{}", rule());
        return Ok(());
    }

    match (report.bucket, report.accuracy_percent) {
        (Some(bucket), Some(pct)) => println!("\nPeak: {bucket} ({pct}% accuracy)"),
        _ => println!("\nNo bucket with correct answers yet."),
    }

    println!();
    for b in &report.buckets {
        let bar = "#".repeat((b.accuracy_percent() / 5) as usize);
        println!(
            "  {:<11} {:>4} attempts {:>4}%  {}",
            b.bucket.label(),
            b.attempts,
            b.accuracy_percent(),
            bar
        );
    }

    println!("\n{}", rule());
    println!("Attempts analyzed: {}", report.attempts_analyzed);
    Ok(())
}
