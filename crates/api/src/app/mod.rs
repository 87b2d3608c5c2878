//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, token and gate wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON envelopes
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: body/query extractors with JSON rejections

use std::sync::Arc;

use anyhow::Context;

use axum::{
    Extension, Router,
    http::{HeaderValue, header},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::ApiConfig;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

use services::{AppServices, BUNDLED_VAC_CENTERS};

/// Build the full HTTP router with in-memory stores (entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = AppServices::in_memory(config);
    if let Some(seed) = &config.admin_seed {
        services.seed_admin(seed).await?;
    }

    let vac_centers = match &config.vac_centers_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => BUNDLED_VAC_CENTERS.to_string(),
    };
    services
        .seed_vac_centers(&vac_centers)
        .await
        .context("seeding vaccination centers")?;

    Ok(router(Arc::new(services)))
}

/// Router over already-built services (tests seed stores before calling this).
pub fn router(services: Arc<AppServices>) -> Router {
    let api = Router::new()
        .nest("/auth", routes::auth::router(&services))
        .nest("/hospitals", routes::hospitals::router(&services))
        .nest("/appointments", routes::appointments::router(&services));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", api)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}
