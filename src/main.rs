//! reading-match - Find reading partners for one club member
//!
//! Loads configuration from the environment, scores the member against every
//! approved club member and prints the ranked matches as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reading_match::adapters::{
    DisabledProvider, FileWeightSource, HttpAnalysisProvider, InMemoryResultCache,
    JsonFileMemberStore, RedisResultCache,
};
use reading_match::application::{
    CompatibilityEngine, DeepAnalysisPipeline, MatchSelector, WeightRefresher,
    WeightRefresherConfig,
};
use reading_match::config::{AppConfig, CacheBackend, LogFormat, LoggingConfig};
use reading_match::domain::compatibility::MatchType;
use reading_match::domain::foundation::MemberId;
use reading_match::domain::health::HealthMonitor;
use reading_match::domain::weights::WeightStore;
use reading_match::ports::{AIProvider, CircuitBreaker, ResultCache};

/// Command-line arguments for reading-match
#[derive(Parser, Debug)]
#[command(name = "reading-match")]
#[command(about = "Rank reading partners for a club member")]
#[command(version)]
struct Args {
    /// Student id of the member looking for partners
    student_id: MemberId,

    /// similar, complementary or smart
    #[arg(short, long, default_value = "similar")]
    match_type: MatchType,

    /// Score with the questionnaire only
    #[arg(long)]
    no_ai: bool,

    /// Member file, overriding READING_MATCH__MEMBERS__PATH
    #[arg(long, env = "READING_MATCH_MEMBERS_FILE")]
    members: Option<PathBuf>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn build_cache(config: &AppConfig) -> Result<Arc<dyn ResultCache>> {
    match config.cache.backend {
        CacheBackend::Memory => Ok(Arc::new(InMemoryResultCache::new())),
        CacheBackend::Redis => {
            let url = config.cache.redis_url.as_deref().unwrap_or_default();
            let cache = RedisResultCache::connect(url, config.cache.key_prefix.clone())
                .await
                .context("Failed to connect to Redis")?;
            Ok(Arc::new(cache))
        }
    }
}

fn build_provider(config: &AppConfig) -> Result<Option<Arc<dyn AIProvider>>> {
    match config.ai.provider_config() {
        Some(provider_config) => {
            let provider = HttpAnalysisProvider::new(provider_config)
                .context("Failed to create AI provider")?;
            Ok(Some(Arc::new(provider)))
        }
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);
    config.validate().context("Invalid configuration")?;

    let weights = Arc::new(WeightStore::new());
    if !config.weights.overrides.is_empty() {
        weights
            .set_weights(config.weights.overrides.clone())
            .context("Invalid weight overrides")?;
    }

    let monitor = Arc::new(HealthMonitor::new(config.health.to_breaker_config()));

    let mut use_ai = !args.no_ai;
    let provider = match build_provider(&config)? {
        Some(provider) => provider,
        None => {
            if use_ai {
                warn!("No AI endpoint configured, scoring with the questionnaire only");
            }
            use_ai = false;
            Arc::new(DisabledProvider::new())
        }
    };

    let pipeline = Arc::new(DeepAnalysisPipeline::with_config(
        provider,
        monitor.clone(),
        config.pipeline_config(),
    ));
    let engine = Arc::new(CompatibilityEngine::new(
        weights.clone(),
        monitor.clone(),
        pipeline,
        build_cache(&config).await?,
        config.matching.engine_config(),
    ));

    let members_path = args.members.unwrap_or_else(|| config.members.path.clone());
    info!(path = %members_path.display(), "Loading members");
    let selector = MatchSelector::new(
        engine,
        Arc::new(JsonFileMemberStore::new(members_path)),
        config.matching.selector_config(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher = config.weights.source_path.clone().map(|path| {
        let refresher = WeightRefresher::with_config(
            Arc::new(FileWeightSource::new(path)),
            weights.clone(),
            WeightRefresherConfig::default().with_poll_interval(config.weights.refresh_interval()),
        );
        tokio::spawn(async move { refresher.run(shutdown_rx).await })
    });

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let outcome = selector
        .find_matches_for(&args.student_id, args.match_type, use_ai, &cancel)
        .await;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = refresher {
        let _ = handle.await;
    }

    let matches = outcome.context("Match search failed")?;
    let health = monitor.snapshot();
    info!(
        matches = matches.len(),
        state = ?health.state,
        error_rate = health.error_rate,
        "Match search complete"
    );

    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}
