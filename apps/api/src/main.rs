mod config;
mod convert;
mod errors;
mod ids;
mod kv;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;
mod upload;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::convert::PdfiumConverter;
use crate::ids::UuidGenerator;
use crate::kv::{KvStore, RedisKvStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, S3FileStore};
use crate::upload::ResumeAnalyzer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume feedback API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let kv: Arc<dyn KvStore> = Arc::new(
        RedisKvStore::connect(&redis)
            .await
            .context("could not connect to Redis")?,
    );
    info!("Redis connection established");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let files: Arc<dyn FileStore> = Arc::new(S3FileStore::new(s3, config.s3_bucket.clone()));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), files.clone())
        .context("could not build HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Bind pdfium once; every conversion shares the loaded library
    let converter =
        PdfiumConverter::bind(config.pdfium_lib_dir.as_deref(), config.render_max_pixels)
            .context("could not load pdfium library")?;
    info!(
        "PDF converter: pdfium from {}, max {} px",
        config
            .pdfium_lib_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "system library".to_string()),
        config.render_max_pixels
    );

    let analyzer = ResumeAnalyzer::new(
        files,
        kv.clone(),
        Arc::new(converter),
        Arc::new(llm),
        Arc::new(UuidGenerator),
    );

    // Build app state
    let state = AppState {
        analyzer,
        kv,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-feedback-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
