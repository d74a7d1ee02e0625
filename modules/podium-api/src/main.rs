use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use podium_common::Config;
use podium_search::{ContentGenerator, SpeechFetcher};

mod rest;

pub struct AppState<G> {
    pub fetcher: SpeechFetcher<G>,
}

pub fn router<G: ContentGenerator + 'static>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // REST API
        .route("/api/samples", get(rest::api_samples))
        .route("/api/speeches", get(rest::api_speeches::<G>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Results are per request; nothing is cached
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("podium=info".parse()?)
                .add_directive("api=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let state = Arc::new(AppState {
        fetcher: SpeechFetcher::from_config(&config),
    });

    let app = router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = addr.as_str(), "Podium API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
