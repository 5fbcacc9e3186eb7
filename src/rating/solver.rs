//! Weighted least squares solver
//!
//! Solves `minimize Σ w_i (y_i - x_i^T β)^2` by scaling each row by
//! `sqrt(w_i)` and solving the resulting ordinary least squares problem
//! with SVD. The trait seam lets tests swap the linear-algebra backend
//! without touching the engine.
//!
//! Singular values below the tolerance are treated as zero, which yields
//! the minimum-norm solution for rank-deficient systems. That matters here:
//! without seeding rows the model is identified only up to an additive
//! shift per connected component of the played-against graph, and the
//! minimum-norm solution preserves that property instead of failing.

use crate::error::{RatingError, Result};
use crate::rating::design::RegressionProblem;
use nalgebra::DVector;

/// Abstraction over the weighted least squares solve
#[cfg_attr(test, mockall::automock)]
pub trait WlsSolver: Send + Sync {
    /// Solve for the coefficient vector, one entry per team column
    fn solve(&self, problem: &RegressionProblem) -> Result<DVector<f64>>;
}

/// SVD-based solver
#[derive(Debug, Clone)]
pub struct SvdWlsSolver {
    /// Singular values at or below this are treated as zero
    tolerance: f64,
}

impl SvdWlsSolver {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for SvdWlsSolver {
    fn default() -> Self {
        Self::new(1e-10)
    }
}

impl WlsSolver for SvdWlsSolver {
    fn solve(&self, problem: &RegressionProblem) -> Result<DVector<f64>> {
        let mut scaled_x = problem.regressors.clone();
        let mut scaled_y = problem.response.clone();

        for i in 0..scaled_x.nrows() {
            let w = problem.weights[i];
            if !(w.is_finite() && w >= 0.0) {
                return Err(RatingError::InternalInvariant {
                    message: format!("invalid observation weight {} at row {}", w, i),
                });
            }
            let scale = w.sqrt();
            for j in 0..scaled_x.ncols() {
                scaled_x[(i, j)] *= scale;
            }
            scaled_y[i] *= scale;
        }

        let svd = scaled_x.svd(true, true);
        let coefficients = svd
            .solve(&scaled_y, self.tolerance)
            .map_err(|e| RatingError::Unsolvable {
                reason: format!("SVD least squares solve failed: {}", e),
            })?;

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(RatingError::Unsolvable {
                reason: "solve produced non-finite coefficients".to_string(),
            });
        }

        Ok(coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::design::DesignMatrixBuilder;
    use crate::types::Game;
    use nalgebra::{DMatrix, DVector};

    fn problem_from(games: &[Game]) -> RegressionProblem {
        DesignMatrixBuilder::build(games, None).unwrap()
    }

    #[test]
    fn test_exact_two_team_solve() {
        // One game, one observation: least squares is exact, and the
        // minimum-norm solution splits the margin symmetrically.
        let problem = problem_from(&[Game::new("A", "B", 20, 10)]);
        let beta = SvdWlsSolver::default().solve(&problem).unwrap();

        assert!((beta[0] - beta[1] - 10.0).abs() < 1e-9);
        assert!((beta[0] + beta[1]).abs() < 1e-9);
    }

    #[test]
    fn test_weights_shift_the_fit() {
        // Two conflicting observations of the same matchup, one a capped
        // blowout: the fitted differential must land closer to the
        // full-weight game's margin.
        let problem = problem_from(&[
            Game::new("A", "B", 10, 0),
            Game::new("B", "A", 400, 0),
        ]);
        let beta = SvdWlsSolver::default().solve(&problem).unwrap();
        let fitted_diff = beta[0] - beta[1];

        // Unweighted the midpoint would be -195; the 0.5 weight on the
        // blowout pulls it up.
        let expected = (1.0 * 10.0 + 0.5 * -400.0) / 1.5;
        assert!((fitted_diff - expected).abs() < 1e-9);
    }

    #[test]
    fn test_seedless_system_solves_with_minimum_norm() {
        // A connected seedless graph is rank-deficient by one (the all-ones
        // shift), yet must still solve.
        let problem = problem_from(&[
            Game::new("A", "B", 10, 0),
            Game::new("B", "C", 5, 0),
        ]);
        let beta = SvdWlsSolver::default().solve(&problem).unwrap();

        assert!((beta[0] - beta[1] - 10.0).abs() < 1e-9);
        assert!((beta[1] - beta[2] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_response_is_unsolvable() {
        let problem = RegressionProblem {
            team_index: vec!["A".to_string(), "B".to_string()],
            response: DVector::from_vec(vec![f64::INFINITY]),
            regressors: DMatrix::from_row_slice(1, 2, &[1.0, -1.0]),
            weights: DVector::from_vec(vec![1.0]),
        };
        assert!(matches!(
            SvdWlsSolver::default().solve(&problem),
            Err(RatingError::Unsolvable { .. })
        ));
    }

    #[test]
    fn test_bad_weight_is_internal_invariant() {
        let problem = RegressionProblem {
            team_index: vec!["A".to_string(), "B".to_string()],
            response: DVector::from_vec(vec![1.0]),
            regressors: DMatrix::from_row_slice(1, 2, &[1.0, -1.0]),
            weights: DVector::from_vec(vec![-1.0]),
        };
        assert!(matches!(
            SvdWlsSolver::default().solve(&problem),
            Err(RatingError::InternalInvariant { .. })
        ));
    }
}
