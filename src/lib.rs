//! LRD Rating - score-differential rating service
//!
//! This crate computes relative team strength ratings from pairwise game
//! outcomes via weighted linear regression, and serves a prediction curve
//! describing how a hypothetical future result would move two teams'
//! ratings.

pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use rating::{DesignMatrixBuilder, PredictionSweep, RatingEngine, SvdWlsSolver, WlsSolver};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
