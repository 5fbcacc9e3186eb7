//! Rating computation from pairwise game outcomes
//!
//! Weighted linear regression over score differentials: a design matrix
//! built from game records, an SVD-backed weighted least squares solve, and
//! a sweep that perturbs the game list to chart prediction sensitivity.

pub mod design;
pub mod engine;
pub mod solver;
pub mod sweep;

// Re-export commonly used types
pub use design::{DesignMatrixBuilder, RegressionProblem, DIFFERENTIAL_CAP, SEEDING_WEIGHT};
pub use engine::RatingEngine;
pub use solver::{SvdWlsSolver, WlsSolver};
pub use sweep::{PredictionSweep, SWEEP_SPAN, SWEEP_STEP};
