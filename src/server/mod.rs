//! HTTP surface of the inventory service.
//!
//! Builds the axum router and owns the shared application state. Every
//! load-mutate-save cycle against the inventory document runs under a
//! single mutex, which serializes writes and closes the lost-update race
//! a naive per-request read-modify-write would have.

mod handlers;
mod pages;

use crate::config::Config;
use crate::photos::PhotoManager;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<StateInner>,
}

struct StateInner {
    host: String,
    port: u16,
    store: Mutex<RecordStore>,
    photos: PhotoManager,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Arc::new(StateInner {
                host: config.server.host.clone(),
                port: config.server.port,
                store: Mutex::new(RecordStore::open(&config.storage.cache_dir)),
                photos: PhotoManager::new(&config.storage.cache_dir),
            }),
        }
    }

    pub fn host(&self) -> &str {
        &self.inner.host
    }

    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Lock the record store for a full load-mutate-save cycle.
    pub async fn store(&self) -> tokio::sync::MutexGuard<'_, RecordStore> {
        self.inner.store.lock().await
    }

    pub fn photos(&self) -> &PhotoManager {
        &self.inner.photos
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/docs", get(pages::docs))
        .route("/inventory", get(handlers::list_records))
        .route(
            "/inventory/:id",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .route("/inventory/:id/photo", get(handlers::get_photo))
        .route(
            "/register",
            get(pages::register_form).post(handlers::register),
        )
        .route(
            "/search",
            get(handlers::search_query).post(handlers::search_form),
        )
        .route("/search/form", get(pages::search_form))
        .with_state(state)
}

/// Bind the configured address and serve until shutdown.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::new(config);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
