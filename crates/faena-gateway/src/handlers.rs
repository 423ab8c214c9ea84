// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers: webhook intake and verification, pickup QR
//! delivery, and the admin endpoints used at the counter.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use faena_core::types::{ClosedLine, Order, OrderClosing, OrderStatus};
use faena_core::FaenaError;
use faena_engine::{Engine, prompts};
use faena_whatsapp::webhook::{self, WebhookPayload};

use crate::qr;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<Engine>,
    /// Expected `hub.verify_token` for webhook verification.
    pub verify_token: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn storage_failure(e: FaenaError) -> Response {
    error!(error = %e, "storage failure in gateway handler");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage failure")
}

/// GET /
///
/// Liveness probe for the hosting platform.
pub async fn get_liveness() -> &'static str {
    "OK"
}

/// Query parameters of the webhook verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /webhook
///
/// Meta's subscription handshake: echo the challenge when the verify
/// token matches, refuse otherwise.
pub async fn get_webhook_verify(
    State(state): State<GatewayState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let token_matches = match (&params.verify_token, &state.verify_token) {
        (Some(given), Some(expected)) => given == expected,
        _ => false,
    };

    if params.mode.as_deref() == Some("subscribe") && token_matches {
        info!("webhook subscription verified");
        return (StatusCode::OK, params.challenge.unwrap_or_default()).into_response();
    }

    warn!("webhook verification refused");
    StatusCode::FORBIDDEN.into_response()
}

/// POST /webhook
///
/// Acknowledge immediately; the conversation turn runs detached so the
/// provider never retries a slow turn.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Json(payload): Json<WebhookPayload>,
) -> &'static str {
    if let Some(event) = webhook::extract_event(&payload) {
        let engine = state.engine.clone();
        tokio::spawn(async move {
            engine.handle_event(event).await;
        });
    }
    "OK"
}

/// Request body for POST /notify.
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /notify
///
/// Free-form outbound text, used by the shop for one-off notices.
pub async fn post_notify(
    State(state): State<GatewayState>,
    Json(body): Json<NotifyRequest>,
) -> Response {
    let (Some(phone), Some(message)) = (
        body.phone.filter(|p| !p.is_empty()),
        body.message.filter(|m| !m.is_empty()),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, "phone and message are required");
    };

    match state.engine.messenger().send_text(&phone, &message).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"status": "sent"}))).into_response(),
        Err(e) => {
            error!(error = %e, "notify delivery failed");
            error_response(StatusCode::BAD_GATEWAY, "delivery failed")
        }
    }
}

/// GET /qr/{order_id}
///
/// The pickup QR as SVG; WhatsApp fetches this link for the image
/// message sent after finalize.
pub async fn get_qr(
    State(state): State<GatewayState>,
    Path(order_id): Path<String>,
) -> Response {
    let order = match state.engine.repository().order_by_id(&order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "unknown order"),
        Err(e) => return storage_failure(e),
    };

    match qr::render_order_qr(&order) {
        Ok(svg) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/svg+xml")],
            svg,
        )
            .into_response(),
        Err(e) => {
            error!(order = %order_id, error = %e, "QR rendering failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "QR rendering failed")
        }
    }
}

/// GET /admin/orders/{id}
pub async fn get_admin_order(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    match state.engine.repository().order_by_id(&id).await {
        Ok(Some(order)) => Json(order).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "unknown order"),
        Err(e) => storage_failure(e),
    }
}

/// One weighed line at the counter.
#[derive(Debug, Deserialize)]
pub struct CloseLine {
    pub product_id: String,
    pub kilos: f64,
}

/// Request body for POST /admin/orders/{id}/close.
#[derive(Debug, Deserialize)]
pub struct CloseRequest {
    pub items: Vec<CloseLine>,
}

/// Response body after closing an order.
#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub total: f64,
}

/// POST /admin/orders/{id}/close
///
/// Prices the weighed kilos against the per-kg prices snapshotted at
/// reservation, marks the order delivered, and messages the customer
/// the final amounts.
pub async fn post_close_order(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<CloseRequest>,
) -> Response {
    let repo = state.engine.repository();

    let order = match repo.order_by_id(&id).await {
        Ok(Some(order)) => order,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "unknown order"),
        Err(e) => return storage_failure(e),
    };

    if order.status == OrderStatus::Delivered {
        return error_response(StatusCode::CONFLICT, "order already delivered");
    }
    if body.items.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "items are required");
    }

    let closing = match price_closing(&order, &body.items) {
        Ok(closing) => closing,
        Err(unknown) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("product not in order: {unknown}"),
            );
        }
    };

    if let Err(e) = repo.close_order(&id, &closing).await {
        return storage_failure(e);
    }

    // The customer message is best effort; the closing already holds.
    let mut closed = order.clone();
    closed.closing = Some(closing.clone());
    closed.status = OrderStatus::Delivered;
    if let Err(e) = state
        .engine
        .messenger()
        .send_text(&order.phone, &prompts::delivered_summary(&closed))
        .await
    {
        warn!(order = %id, error = %e, "delivered notice failed");
    }

    Json(CloseResponse {
        total: closing.total,
    })
    .into_response()
}

/// Price weighed lines against the order's reserved items. Returns the
/// offending product id when a line does not belong to the order.
fn price_closing(order: &Order, items: &[CloseLine]) -> Result<OrderClosing, String> {
    let mut lines = Vec::with_capacity(items.len());
    for weighed in items {
        let reserved = order
            .items
            .iter()
            .find(|i| i.product_id == weighed.product_id)
            .ok_or_else(|| weighed.product_id.clone())?;
        let subtotal = weighed.kilos * reserved.price_per_kg;
        lines.push(ClosedLine {
            product_id: reserved.product_id.clone(),
            name: reserved.name.clone(),
            kilos: weighed.kilos,
            price_per_kg: reserved.price_per_kg,
            subtotal,
        });
    }
    let total = lines.iter().map(|l| l.subtotal).sum();
    Ok(OrderClosing {
        lines,
        total,
        delivered_at: Utc::now(),
    })
}
