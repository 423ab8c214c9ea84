// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use faena_config::GatewayConfig;
use faena_core::FaenaError;

use crate::handlers::{self, GatewayState};

/// Assemble the full route table over shared state.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::get_liveness))
        .route(
            "/webhook",
            get(handlers::get_webhook_verify).post(handlers::post_webhook),
        )
        .route("/notify", post(handlers::post_notify))
        .route("/qr/{order_id}", get(handlers::get_qr))
        .route("/admin/orders/{id}", get(handlers::get_admin_order))
        .route("/admin/orders/{id}/close", post(handlers::post_close_order))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), FaenaError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FaenaError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| FaenaError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
