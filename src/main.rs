use clap::Parser;
use scholarship_recommender::config::Settings;
use scholarship_recommender::core::{RecommendationGenerator, Recommender, SYSTEM_PROMPT};
use scholarship_recommender::models::{ErrorResponse, RecommendResponse};
use scholarship_recommender::services::{
    CatalogStore, InMemoryStore, OpenAiClient, PostgresStore, ProfileStore,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Recommend scholarships for a user
#[derive(Debug, Parser)]
#[command(name = "scholarship-recommender", version, about)]
struct Cli {
    /// User whose profile drives the recommendation
    #[arg(long)]
    user_id: i64,

    /// Settings file; defaults to config/default.toml and config/local.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of profiles, used instead of PostgreSQL together with --catalog
    #[arg(long, requires = "catalog")]
    profiles: Option<PathBuf>,

    /// JSON array of scholarship records
    #[arg(long, requires = "profiles")]
    catalog: Option<PathBuf>,
}

type Stores = (Arc<dyn ProfileStore>, Arc<dyn CatalogStore>);

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Configuration loaded successfully");

    match run(&cli, &settings).await {
        Ok(response) => {
            print_json(&response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Recommendation failed for user {}: {}", cli.user_id, e);
            print_json(&ErrorResponse {
                error: "recommendation_failed".to_string(),
                message: e,
            });
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.compact().init(),
    }
}

async fn run(cli: &Cli, settings: &Settings) -> Result<RecommendResponse, String> {
    let (profiles, catalog) = open_stores(cli, settings).await?;

    let llm = OpenAiClient::new(settings.llm.client_config(SYSTEM_PROMPT))
        .map_err(|e| format!("Failed to create text-generation client: {}", e))?;

    info!(
        "Text generator: model {} at {} (timeout {}s, {} attempts)",
        settings.llm.model, settings.llm.base_url, settings.llm.timeout_secs, settings.llm.max_retries
    );

    let generator = RecommendationGenerator::new(
        Arc::new(llm),
        settings.llm.retry_policy(),
        settings.recommendation.options(),
    );
    let recommender = Recommender::new(profiles, catalog, generator);

    let outcome = recommender.run(cli.user_id).await.map_err(|e| e.to_string())?;

    Ok(RecommendResponse {
        user_id: outcome.user_id,
        source: outcome.source.as_str().to_string(),
        total_candidates: outcome.total_candidates,
        recommendations: outcome.into_recommendations(),
    })
}

async fn open_stores(cli: &Cli, settings: &Settings) -> Result<Stores, String> {
    if let (Some(profiles), Some(catalog)) = (&cli.profiles, &cli.catalog) {
        let store = Arc::new(
            InMemoryStore::from_json_files(profiles, catalog).map_err(|e| e.to_string())?,
        );
        let profile_store: Arc<dyn ProfileStore> = store.clone();
        let catalog_store: Arc<dyn CatalogStore> = store;
        return Ok((profile_store, catalog_store));
    }

    let db = &settings.database;
    let store = PostgresStore::new(
        &db.url,
        db.max_connections.unwrap_or(5),
        Duration::from_secs(db.acquire_timeout_secs.unwrap_or(5)),
        db.profile_table.clone(),
        db.catalog_table.clone(),
    )
    .await
    .map_err(|e| format!("PostgreSQL connection error: {}", e))?;

    match store.health_check().await {
        Ok(_) => info!("PostgreSQL store initialized"),
        Err(e) => warn!("PostgreSQL health check failed: {}", e),
    }

    let store = Arc::new(store);
    let profile_store: Arc<dyn ProfileStore> = store.clone();
    let catalog_store: Arc<dyn CatalogStore> = store;
    Ok((profile_store, catalog_store))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}
