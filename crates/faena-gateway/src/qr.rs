// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pickup QR rendering.
//!
//! The QR encodes the order coordinates the counter needs to pull up the
//! reservation; it is rendered as standalone SVG so WhatsApp can fetch
//! it straight from the gateway.

use qrcode::render::svg;
use qrcode::QrCode;

use faena_core::types::Order;
use faena_core::FaenaError;
use faena_engine::prompts;

/// Render the pickup QR for an order as an SVG document.
pub fn render_order_qr(order: &Order) -> Result<String, FaenaError> {
    let time = order.time.as_deref().unwrap_or(prompts::DIRECT_WINDOW);
    let data = format!(
        "PEDIDO:{}\nFECHA:{}\nHORA:{}\nTEL:{}",
        order.id,
        order.date.format("%Y-%m-%d"),
        time,
        order.phone,
    );

    let code = QrCode::new(data.as_bytes())
        .map_err(|e| FaenaError::Internal(format!("QR encoding failed: {e}")))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(320, 320)
        .quiet_zone(true)
        .build())
}
