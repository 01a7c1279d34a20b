//! hantel - Fitness training tracker
//!
//! Terminal client (CLI + TUI) for the studio's REST backend. The backend is
//! the single source of truth; every view re-fetches after a mutation.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod tui;
pub mod views;

pub use api::{FitnessApi, HttpFitnessApi};
pub use config::Config;
pub use error::ApiError;
