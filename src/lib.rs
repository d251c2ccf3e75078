//! PrimerGPT Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod generation;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod security;

pub use config::Config;
pub use error::{AppError, Result};
pub use routes::router;

use std::sync::Arc;

use db::{InMemoryRateLimitStore, JsonFileUserStore, RateLimitStore, UserRepository};
use generation::{build_backend, GenerationBackend, MockBackend};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserRepository>,
    /// Backend behind `/api/generate` and the image endpoints
    pub backend: Arc<dyn GenerationBackend>,
    /// Keyword responder behind `/api/chat` and the realtime channel
    pub mock: Arc<MockBackend>,
    pub rate_limits: Arc<dyn RateLimitStore>,
}

impl AppState {
    /// Create a new AppState with explicit stores and backend
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        let mock = Arc::new(MockBackend::from_config(&config));
        Self {
            config,
            users,
            backend,
            mock,
            rate_limits: Arc::new(InMemoryRateLimitStore::new()),
        }
    }

    /// Open the file-backed user store and build the configured backend
    pub async fn from_config(config: Config) -> Result<Self> {
        let users = Arc::new(JsonFileUserStore::open(&config.users_path).await?);
        let backend = build_backend(&config)
            .map_err(|e| AppError::Internal(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self::new(config, users, backend))
    }
}
