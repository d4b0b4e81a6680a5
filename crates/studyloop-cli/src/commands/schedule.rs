//! Schedule recommendation command.

use chrono::Utc;
use clap::Args;

use studyloop_core::{ActivityLog, ScheduleAdvisor};

use super::common::{load_config, print_json, utc_offset, CmdResult, LogArgs};

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub log: LogArgs,
    #[arg(long)]
    pub subject: String,
    /// Evaluate as if it were this hour of day (0-23)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,
    /// Minutes east of UTC (defaults to the local offset)
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

pub fn run(args: ScheduleArgs) -> CmdResult {
    let config = load_config()?;
    let log = args.log.open()?;

    let offset = utc_offset(args.utc_offset)?;
    let mut advisor = ScheduleAdvisor::from_config(&config);
    advisor.peak = advisor.peak.with_offset(offset);

    let user = &args.log.user;
    let recommendation = match args.hour {
        Some(hour) => {
            let recent = log.recent(user, &args.subject, None, advisor.config.recent_window)?;
            let history = log.history(user, Some(&args.subject))?;
            advisor.evaluate(&recent, &history, hour)
        }
        None => advisor.recommend(&log, user, &args.subject, Utc::now()),
    };

    if args.log.json {
        return print_json(&recommendation);
    }

    let ctx = &recommendation.context;
    println!("Recommended session for {user} in {}", args.subject);
    println!("  Focus:   {} min", recommendation.focus_minutes);
    println!("  Break:   {} min", recommendation.break_minutes);
    println!("  Reason:  {}", recommendation.reason);
    println!(
        "  Recent accuracy: {}% over {} attempts",
        ctx.recent_accuracy, ctx.activities_analyzed
    );
    if let Some(slot) = ctx.current_time_slot {
        println!("  Time slot: {slot}");
    }
    if let Some(err) = &ctx.error {
        println!("  Note: {err}");
    }
    Ok(())
}
