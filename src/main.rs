//! Delaygate - rental buffer impact backend
//!
//! Serves the delay-impact analytics engine (consecutive-pair statistics and
//! the buffer-threshold counterfactual) and the pre-fitted car pricing model
//! over HTTP. All analytics run against an immutable snapshot of the rental
//! log loaded once at startup.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delaygate_backend::{
    api, ingest, middleware::logging::request_logging, models::Config, pricing::PriceModel,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(port = config.port, "🚗 starting delaygate backend");

    let snapshot = Arc::new(ingest::load_snapshot(&config.rentals_path)?);
    let pricer = Arc::new(PriceModel::from_file(&config.pricing_model_path)?);

    let app = api::create_router(snapshot, pricer)
        .layer(axum::middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
