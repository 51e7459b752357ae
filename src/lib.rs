//! Biblion Book Lending System
//!
//! A Rust server for a lending library: members borrow and return books
//! from a finite inventory over a REST JSON API, librarians manage the
//! catalog, administrators manage roles.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
