//! HTTP service for the rating engine

pub mod app;

pub use app::{create_router, serve, ApiError, AppState};
