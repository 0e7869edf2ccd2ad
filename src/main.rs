use anyhow::Result;
use shl_recommender::api::HttpServer;
use shl_recommender::recommend::load_recommender;
use shl_recommender::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = Config::load();

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", Config::startup_log_level(&loaded))
    ).init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("serve");

    match command {
        "serve" => run_http_server(config).await?,
        "check" => run_catalog_check(&config)?,
        other => {
            anyhow::bail!("Unknown command: {}. Usage: shl-recommender [serve|check]", other);
        }
    }

    Ok(())
}

/// Run the HTTP API
async fn run_http_server(config: Config) -> Result<()> {
    log::info!("Starting SHL Recommender v{}", env!("CARGO_PKG_VERSION"));

    // Catalog load failures are fatal: no partial catalog is served
    let recommender = Arc::new(load_recommender(&config)?);
    log::info!(
        "Catalog ready: {} assessments from {}",
        recommender.catalog().len(),
        config.catalog_path().display()
    );

    let server = HttpServer::new(recommender, &config);
    server.run(config.http_server.port).await?;

    Ok(())
}

/// Load the catalog and report what it contains
fn run_catalog_check(config: &Config) -> Result<()> {
    let recommender = load_recommender(config)?;
    let catalog = recommender.catalog();

    log::info!("Catalog path: {}", config.catalog_path().display());
    log::info!("Assessments: {}", catalog.len());
    log::info!("Job levels: {}", catalog.job_levels().len());
    log::info!("Test types: {}", catalog.test_types().join(", "));
    log::info!("Languages: {}", catalog.languages().len());

    let without_duration = catalog.by_filter(|r| r.duration.is_none()).len();
    if without_duration > 0 {
        log::warn!("{} assessments have no parseable duration", without_duration);
    }
    let without_description = catalog.by_filter(|r| r.description.trim().is_empty()).len();
    if without_description > 0 {
        log::warn!(
            "{} assessments have no description; they can only match on name",
            without_description
        );
    }

    log::info!("✓ Catalog check complete");
    Ok(())
}
