// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CommandPost API Server
//!
//! Serves defence-exam articles and notifications, user accounts with
//! bookmarks, and the admin content dashboard.

use commandpost::{
    config::{Config, StorageBackend},
    db::{FirestoreDb, Stores},
    time_utils::SystemClock,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        storage = ?config.storage,
        "Starting CommandPost API"
    );

    let stores = match config.storage {
        StorageBackend::Firestore => {
            Stores::firestore(FirestoreDb::new(&config.gcp_project_id).await?)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will not survive a restart");
            Stores::memory()
        }
    };

    let admin = config.admin.clone();
    let port = config.port;
    let state = Arc::new(AppState::new(config, stores, Arc::new(SystemClock))?);

    if let Some(admin) = admin {
        let identity = state.auth.ensure_admin(&admin).await?;
        tracing::info!(identity_id = %identity.id, "Admin account ready");
    }

    // Build router
    let app = commandpost::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("commandpost=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
