use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use cancel_checker::adapters::extraction::{HttpContentFetcher, StandardFileExtractor};
use cancel_checker::app::{build_cache, build_handlers, build_provider, build_router, AppDependencies};
use cancel_checker::config::{AppConfig, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let provider = build_provider(&config.ai)?;
    let deps = AppDependencies {
        provider: Arc::new(provider),
        cache: build_cache(&config.analysis),
        fetcher: Arc::new(
            HttpContentFetcher::new(config.analysis.fetch_timeout())?
                .with_max_body_bytes(config.analysis.max_upload_bytes),
        ),
        extractor: Arc::new(StandardFileExtractor::new(config.analysis.max_upload_bytes)),
    };

    let router = build_router(build_handlers(deps, &config), &config);

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        primary_model = %config.ai.primary_model,
        fallback_model = %config.ai.fallback_model,
        cache_enabled = config.analysis.cache_enabled,
        "cancel checker listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("cancel checker shut down");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over config.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
