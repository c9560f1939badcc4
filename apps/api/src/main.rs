mod config;
mod db;
mod errors;
mod extraction;
mod matching;
mod routes;
mod similarity;
mod sources;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::extraction::{SkillExtractor, SkillVocabulary};
use crate::matching::engine::MatchEngine;
use crate::routes::build_router;
use crate::similarity::TokenCosineSimilarity;
use crate::sources::jooble::JoobleSource;
use crate::sources::jsearch::JSearchSource;
use crate::sources::remoteok::RemoteOkSource;
use crate::sources::{JobSource, SourceAggregator};
use crate::state::AppState;
use crate::store::PgJobStore;

const USER_AGENT: &str = concat!("job-match-api/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the job store
    let pool = create_pool(&config.database_url).await?;
    ensure_schema(&pool).await?;
    let store = Arc::new(PgJobStore::new(pool));

    // Skill extractor from the vocabulary file (missing file degrades to
    // an empty vocabulary)
    let extractor = Arc::new(SkillExtractor::new(SkillVocabulary::load(
        &config.skills_vocab_path,
    )));
    info!(
        "Skill extractor initialized ({} vocabulary terms)",
        extractor.vocabulary_size()
    );

    // Shared HTTP client for the live job sources
    let source_timeout = Duration::from_secs(config.source_timeout_secs);
    let http = reqwest::Client::builder()
        .timeout(source_timeout)
        .user_agent(USER_AGENT)
        .build()?;

    let live_sources: Vec<Arc<dyn JobSource>> = vec![
        Arc::new(RemoteOkSource::new(http.clone())),
        Arc::new(JoobleSource::new(http.clone(), config.jooble_api_key.clone())),
        Arc::new(JSearchSource::new(http, config.jsearch_api_key.clone())),
    ];
    let aggregator = Arc::new(SourceAggregator::new(
        live_sources,
        Arc::clone(&extractor),
        source_timeout,
    ));

    // Similarity backend (token-cosine by default; the trait is the seam
    // for an embedding-backed impl)
    let similarity = Arc::new(TokenCosineSimilarity);

    let engine = Arc::new(MatchEngine::new(
        store,
        aggregator,
        similarity.clone(),
        Arc::clone(&extractor),
    ));

    let state = AppState {
        engine,
        extractor,
        similarity,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
