//! Configuration management for the rating service

pub mod app;

pub use app::{validate_config, AppConfig, CorsSettings, ServiceSettings};
