// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `faena serve`: wire storage, transport, and engine, then run the
//! gateway until stopped.

use std::sync::Arc;

use tracing::info;

use faena_config::FaenaConfig;
use faena_core::FaenaError;
use faena_engine::{Engine, EngineConfig, InMemorySessionStore};
use faena_gateway::GatewayState;
use faena_storage::SqliteStore;
use faena_whatsapp::WhatsAppMessenger;

pub async fn run(config: FaenaConfig) -> Result<(), FaenaError> {
    let repo = Arc::new(SqliteStore::open(&config.storage).await?);
    let messenger = Arc::new(WhatsAppMessenger::new(&config.whatsapp)?);
    let sessions = Arc::new(InMemorySessionStore::new());

    let engine = Arc::new(Engine::new(
        repo.clone(),
        messenger,
        sessions,
        EngineConfig {
            shop_name: config.shop.name.clone(),
            days_ahead: config.shop.days_ahead,
            warning_secs: config.session.warning_secs,
            timeout_secs: config.session.timeout_secs,
            session_ttl_secs: config.session.ttl_secs,
            public_url: config.gateway.public_url.clone(),
        },
    ));

    info!(shop = %config.shop.name, "starting Faena ordering bot");

    let result = faena_gateway::start_server(
        &config.gateway,
        GatewayState {
            engine,
            verify_token: config.whatsapp.verify_token.clone(),
        },
    )
    .await;

    repo.close().await?;
    result
}
