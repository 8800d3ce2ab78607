//! BookHub server
//!
//! A REST JSON API exposing CRUD endpoints over library users and books,
//! with case-insensitive search on list endpoints.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
