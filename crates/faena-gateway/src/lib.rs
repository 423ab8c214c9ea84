// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Faena ordering bot.
//!
//! Hosts the WhatsApp webhook (verification handshake plus message
//! intake), serves pickup QR images, and exposes the small admin API
//! used at the counter.

pub mod handlers;
pub mod qr;
pub mod server;

pub use handlers::GatewayState;
pub use server::{build_router, start_server};
