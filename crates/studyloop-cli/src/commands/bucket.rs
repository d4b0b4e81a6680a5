use clap::Args;
use serde_json::json;

use studyloop_core::TimeBucket;

use super::common::{print_json, CmdResult};

#[derive(Args)]
pub struct BucketArgs {
    /// Hour of day (0-23)
    #[arg(value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: u32,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: BucketArgs) -> CmdResult {
    let bucket = TimeBucket::from_hour(args.hour);
    if args.json {
        return print_json(&json!({ "hour": args.hour, "bucket": bucket, "label": bucket.label() }));
    }
    println!("{bucket}");
    Ok(())
}
