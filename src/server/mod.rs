pub mod handlers;
pub mod rate_limit;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::humanize;

use rate_limit::LimiterState;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let general = LimiterState {
        limiter: state.general_limiter.clone(),
        trust_proxy_hops: state.config.trust_proxy_hops,
    };
    let comparisons = LimiterState {
        limiter: state.compare_limiter.clone(),
        trust_proxy_hops: state.config.trust_proxy_hops,
    };

    let api_routes = Router::new()
        .route(
            "/compare",
            post(handlers::compare)
                .route_layer(from_fn_with_state(comparisons, rate_limit::enforce)),
        )
        .route("/download-pdf", post(handlers::download_pdf))
        .fallback(handlers::api_not_found)
        .layer(from_fn_with_state(general, rate_limit::enforce));

    let static_dir = state.config.static_dir.clone();
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(24 * 60 * 60));

    if !config.production {
        return cors.allow_origin(Any);
    }

    match config.cors_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "CORS_ORIGIN is not a valid header value; cross-origin requests are refused");
            cors
        }
        None => {
            tracing::warn!("CORS_ORIGIN is not set in production; cross-origin requests are refused");
            cors
        }
    }
}

pub async fn serve(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let window = humanize(config.rate_limit_window);
    let (general_limit, compare_limit) = (config.general_rate_limit, config.compare_rate_limit);

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; comparisons will fail");
    }
    if !config.web_search_enabled() {
        tracing::info!("TAVILY_API_KEY is not set; web search is disabled");
    }

    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind on {addr}"))?;

    tracing::info!("listening on {addr}");
    tracing::info!("health check: http://localhost:{}/health", addr.port());
    tracing::info!(
        "rate limiting: general API {general_limit} requests per {window}, comparisons {compare_limit} requests per {window}"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
