//! Benchmark CLI: run labeled queries and report P@K, NDCG@K, MRR and diversity.

use clap::Parser;
use shl_recommender::eval::{load_queries, report, sample_queries, Evaluator, QueryFile};
use shl_recommender::recommend::load_recommender;
use shl_recommender::Config;
use std::path::PathBuf;

/// Evaluate recommendation quality over a labeled query set.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    /// Path to eval queries JSON (default: eval.queries_path from config).
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Cut-off K (default: eval.k from config).
    #[arg(long)]
    k: Option<usize>,

    /// Directory for benchmark_results.json / .svg (default: eval.output_dir).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the summary without writing report files.
    #[arg(long)]
    no_write: bool,
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

    let queries_path = args.queries.unwrap_or_else(|| config.eval.queries_path.clone());
    let k = args.k.unwrap_or(config.eval.k);
    let output_dir = args.output.unwrap_or_else(|| config.eval.output_dir.clone());

    let recommender = load_recommender(&config)?;

    let file = if queries_path.exists() {
        load_queries(&queries_path)?
    } else {
        log::warn!(
            "{} not found; using built-in sample queries",
            queries_path.display()
        );
        QueryFile {
            queries: sample_queries(),
            malformed: 0,
        }
    };

    if file.queries.is_empty() && file.malformed == 0 {
        anyhow::bail!("No queries in {}", queries_path.display());
    }

    println!(
        "Running evaluation on {} queries (K = {})\n",
        file.queries.len() + file.malformed,
        k
    );

    let evaluator = Evaluator::new(&recommender);
    let results = evaluator.evaluate_file(&file, k)?;

    print!("{}", report::render_summary(&results));

    if !args.no_write {
        let json_path = report::write_json(&results, &output_dir)?;
        println!("\nReport written to {}", json_path.display());
        if results.per_query.is_empty() {
            log::warn!("Nothing evaluated; skipping chart");
        } else {
            let svg_path = report::write_svg(&results, &output_dir)?;
            println!("Chart written to {}", svg_path.display());
        }
    }

    Ok(())
}
