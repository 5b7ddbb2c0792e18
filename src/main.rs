// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

use std::net::SocketAddr;

use chrono::Duration;
use tracing_subscriber::EnvFilter;

use basislager_server::api::router;
use basislager_server::auth::TokenService;
use basislager_server::config::AppConfig;
use basislager_server::state::AppState;
use basislager_server::storage::{DataStore, EventRepository, StoragePaths, StoredEvent};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Missing or invalid configuration is fatal; in particular there is
    // no fallback signing secret.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let mut store = DataStore::new(StoragePaths::new(&config.data_dir));
    if let Err(e) = store.initialize() {
        tracing::error!(error = %e, data_dir = %config.data_dir.display(), "failed to initialize storage");
        std::process::exit(1);
    }

    // First-run seeding: create the event record from the environment so
    // registration works before any admin exists.
    if let Ok(password) = std::env::var("SEED_REGISTRATION_PASSWORD") {
        let events = EventRepository::new(&store);
        if !events.exists() {
            let title =
                std::env::var("SEED_EVENT_TITLE").unwrap_or_else(|_| "LAN Party".to_string());
            if let Err(e) = events.put(&StoredEvent::new(title, password)) {
                tracing::error!(error = %e, "failed to seed event record");
                std::process::exit(1);
            }
            tracing::info!("seeded event record");
        }
    }

    let mut tokens = TokenService::new(config.token_secret.as_bytes());
    if let Some(ttl) = config.token_ttl_secs {
        tokens = tokens.with_ttl(Duration::seconds(ttl));
        tracing::info!(ttl_secs = ttl, "tokens expire");
    } else {
        tracing::info!("tokens do not expire; logout is client-local");
    }

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse bind address");
            std::process::exit(1);
        }
    };

    let state = AppState::new(store, tokens, config);
    let app = router(state);

    tracing::info!(%addr, "basislager server listening (docs at /docs)");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
