use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyloop", version, about = "Studyloop practice analytics CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an hour of the day into a time bucket
    Bucket(commands::bucket::BucketArgs),
    /// Confidence score over the most recent attempts
    Confidence(commands::confidence::ConfidenceArgs),
    /// Verdict over the last five attempts
    Cycle(commands::cycle::CycleArgs),
    /// Best time-of-day bucket from the full history
    Peak(commands::peak::PeakArgs),
    /// Recommended focus/break durations
    Schedule(commands::schedule::ScheduleArgs),
    /// Re-run a topic's attempts through a practice session
    Replay(commands::replay::ReplayArgs),
    /// Next question from a question bank
    Question(commands::question::QuestionArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STUDYLOOP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Bucket(args) => commands::bucket::run(args),
        Commands::Confidence(args) => commands::confidence::run(args),
        Commands::Cycle(args) => commands::cycle::run(args),
        Commands::Peak(args) => commands::peak::run(args),
        Commands::Schedule(args) => commands::schedule::run(args),
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Question(args) => commands::question::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
