//! Recommendation CLI: rank catalog assessments for a job description.

use clap::Parser;
use shl_recommender::recommend::load_recommender;
use shl_recommender::{Config, RecommendationFilters};
use std::time::Instant;

/// Recommend SHL assessments for a job description.
#[derive(Parser, Debug)]
#[command(name = "recommend")]
struct Args {
    /// Job description or search query.
    query: String,

    /// Only assessments offered at this job level.
    #[arg(long)]
    job_level: Option<String>,

    /// Only assessments of this test type.
    #[arg(long)]
    test_type: Option<String>,

    /// Maximum duration in minutes.
    #[arg(long)]
    max_duration: Option<u32>,

    /// Minimum duration in minutes.
    #[arg(long)]
    min_duration: Option<u32>,

    /// Accept assessments available in this language (repeatable).
    #[arg(long = "language")]
    languages: Vec<String>,

    /// Only assessments that support remote testing.
    #[arg(long)]
    remote: bool,

    /// Only adaptive (IRT) assessments.
    #[arg(long)]
    adaptive: bool,

    /// Number of recommendations (defaults to search.default_top_n).
    #[arg(long)]
    top_n: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let loaded = Config::load();
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", Config::startup_log_level(&loaded)),
    )
    .init();
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if args.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let recommender = load_recommender(&config)?;

    let filters = RecommendationFilters {
        job_level: args.job_level,
        test_type: args.test_type,
        min_duration: args.min_duration,
        max_duration: args.max_duration,
        languages: if args.languages.is_empty() {
            None
        } else {
            Some(args.languages)
        },
        remote_support: args.remote.then_some(true),
        adaptive_irt: args.adaptive.then_some(true),
    };
    let top_n = args.top_n.unwrap_or(config.search.default_top_n);

    let start = Instant::now();
    let results = recommender.rank(&args.query, &filters, top_n)?;
    let elapsed = start.elapsed();

    if results.is_empty() {
        println!("No assessments match the given filters.");
        return Ok(());
    }

    for result in &results {
        let record = result.record;
        println!("{}. {}", result.rank, record.name);
        println!("   URL: {}", record.url);
        println!("   Remote Testing: {}", if record.remote_support { "Yes" } else { "No" });
        println!("   Adaptive/IRT: {}", if record.adaptive_irt { "Yes" } else { "No" });
        match record.duration {
            Some(minutes) => println!("   Duration: {} minutes", minutes),
            None => println!("   Duration: unknown"),
        }
        println!("   Test Type: {}", record.test_type);
        println!("   Score: {:.4}", result.score);
    }
    println!("\n{} results in {:?}", results.len(), elapsed);

    Ok(())
}
