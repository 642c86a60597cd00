//! Composition root: wires adapters into handlers and builds the router.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::ai::{FailoverAIProvider, GroqConfig, GroqProvider};
use crate::adapters::cache::{InMemoryAnalysisCache, NoopAnalysisCache};
use crate::adapters::http::analysis::MULTIPART_OVERHEAD_BYTES;
use crate::adapters::http::{analysis_routes, request_timeout_middleware, AnalysisHandlers};
use crate::application::{
    AnalysisOptions, AnalyzeContentHandler, AnalyzeFileHandler, AnalyzeUrlHandler,
    BatchAnalyzeHandler, CheckProviderHandler,
};
use crate::config::{AiConfig, AnalysisConfig, AppConfig, ServerConfig};
use crate::ports::{AIError, AIProvider, AnalysisCache, ContentFetcher, FileExtractor};

/// Port implementations the handlers run against.
#[derive(Clone)]
pub struct AppDependencies {
    pub provider: Arc<dyn AIProvider>,
    pub cache: Arc<dyn AnalysisCache>,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub extractor: Arc<dyn FileExtractor>,
}

/// Groq primary model with the instant model as fallback.
pub fn build_provider(
    config: &AiConfig,
) -> Result<FailoverAIProvider<GroqProvider, GroqProvider>, AIError> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let base = GroqConfig::new(api_key)
        .with_base_url(config.base_url.clone())
        .with_timeout(config.timeout())
        .with_max_retries(config.max_retries);

    let primary = GroqProvider::new(base.clone().with_model(config.primary_model.clone()))?;
    let fallback = GroqProvider::new(base.with_model(config.fallback_model.clone()))?;
    Ok(FailoverAIProvider::new(primary).with_fallback(fallback))
}

/// In-memory cache, or a cache that stores nothing when disabled.
pub fn build_cache(config: &AnalysisConfig) -> Arc<dyn AnalysisCache> {
    if config.cache_enabled {
        Arc::new(InMemoryAnalysisCache::new(
            config.cache_capacity,
            config.cache_ttl(),
        ))
    } else {
        Arc::new(NoopAnalysisCache)
    }
}

pub fn build_handlers(deps: AppDependencies, config: &AppConfig) -> AnalysisHandlers {
    let options = AnalysisOptions {
        max_content_chars: config.analysis.max_content_chars,
        max_tokens: config.ai.max_tokens,
        temperature: config.ai.temperature,
    };

    let content = Arc::new(AnalyzeContentHandler::new(
        deps.provider.clone(),
        deps.cache,
        options,
    ));

    AnalysisHandlers::new(
        content.clone(),
        Arc::new(AnalyzeUrlHandler::new(deps.fetcher, content.clone())),
        Arc::new(AnalyzeFileHandler::new(deps.extractor, content.clone())),
        Arc::new(BatchAnalyzeHandler::new(
            content,
            config.analysis.max_batch_items,
        )),
        Arc::new(CheckProviderHandler::new(deps.provider)),
    )
}

/// Full router with tracing, CORS, timeout and body limit layers.
pub fn build_router(handlers: AnalysisHandlers, config: &AppConfig) -> Router {
    let max_upload = config.analysis.max_upload_bytes;

    analysis_routes(handlers, max_upload)
        .layer(RequestBodyLimitLayer::new(
            max_upload.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(middleware::from_fn_with_state(
            config.server.request_timeout(),
            request_timeout_middleware,
        ))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        if server.is_production() {
            return CorsLayer::new();
        }
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
