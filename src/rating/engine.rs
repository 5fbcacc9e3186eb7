//! Rating engine: design matrix construction plus the regression solve

use crate::error::{RatingError, Result};
use crate::rating::design::DesignMatrixBuilder;
use crate::rating::solver::{SvdWlsSolver, WlsSolver};
use crate::types::{Game, RatingTable, Seeding};
use tracing::debug;

/// Computes relative team ratings from game records.
///
/// Stateless across calls: every invocation builds its regression problem
/// from scratch, so a single engine can serve concurrent requests.
pub struct RatingEngine {
    solver: Box<dyn WlsSolver>,
}

impl RatingEngine {
    /// Create an engine with a specific solver implementation
    pub fn new(solver: Box<dyn WlsSolver>) -> Self {
        Self { solver }
    }

    /// Create an engine backed by the default SVD solver
    pub fn with_default_solver() -> Self {
        Self::new(Box::new(SvdWlsSolver::default()))
    }

    /// Fit ratings for every team appearing in `games`.
    ///
    /// Each rating is the fitted coefficient for that team's column; only
    /// differences between two ratings are meaningful, as a predicted score
    /// differential.
    pub fn rate(&self, games: &[Game], seeding: Option<&Seeding>) -> Result<RatingTable> {
        let problem = DesignMatrixBuilder::build(games, seeding)?;
        let coefficients = self.solver.solve(&problem)?;

        if coefficients.len() != problem.team_index.len() {
            return Err(RatingError::InternalInvariant {
                message: format!(
                    "solver returned {} coefficients for {} teams",
                    coefficients.len(),
                    problem.team_index.len()
                ),
            });
        }

        debug!(
            teams = problem.team_index.len(),
            observations = problem.response.len(),
            "rated teams"
        );

        Ok(problem
            .team_index
            .iter()
            .cloned()
            .zip(coefficients.iter().copied())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::solver::MockWlsSolver;
    use nalgebra::DVector;

    fn game(home: &str, away: &str, sh: i64, sa: i64) -> Game {
        Game::new(home, away, sh, sa)
    }

    #[test]
    fn test_single_game_differential_is_exact() {
        let engine = RatingEngine::with_default_solver();
        let ratings = engine.rate(&[game("A", "B", 20, 10)], None).unwrap();

        assert!((ratings["A"] - ratings["B"] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_is_deterministic() {
        let engine = RatingEngine::with_default_solver();
        let games = vec![
            game("A", "B", 30, 10),
            game("B", "C", 15, 20),
            game("C", "A", 8, 8),
        ];
        let seeding: Seeding = [("A".to_string(), 12.0)].into_iter().collect();

        let first = engine.rate(&games, Some(&seeding)).unwrap();
        let second = engine.rate(&games, Some(&seeding)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seeding_anchors_disconnected_components() {
        // Two components with no cross-game: each sits on its own virtual
        // anchor, so both solve individually and the seeded scale makes
        // their difference meaningful.
        let games = vec![game("A", "B", 10, 0), game("C", "D", 7, 0)];
        let seeding: Seeding = [
            ("A".to_string(), 50.0),
            ("B".to_string(), 40.0),
            ("C".to_string(), 10.0),
            ("D".to_string(), 3.0),
        ]
        .into_iter()
        .collect();

        let engine = RatingEngine::with_default_solver();
        let ratings = engine.rate(&games, Some(&seeding)).unwrap();

        assert_eq!(ratings.len(), 4);
        for rating in ratings.values() {
            assert!(rating.is_finite());
        }
        // The seeded component means sit near their priors.
        assert!(ratings["A"] > ratings["C"]);
    }

    #[test]
    fn test_seeding_pulls_rating_toward_prior() {
        let games = vec![game("A", "B", 10, 0)];
        let seeding: Seeding = [("A".to_string(), 100.0), ("B".to_string(), 0.0)]
            .into_iter()
            .collect();

        let engine = RatingEngine::with_default_solver();
        let unseeded = engine.rate(&games, None).unwrap();
        let seeded = engine.rate(&games, Some(&seeding)).unwrap();

        assert!(seeded["A"] > unseeded["A"]);
    }

    #[test]
    fn test_coefficient_count_mismatch_is_internal_invariant() {
        let mut solver = MockWlsSolver::new();
        solver
            .expect_solve()
            .returning(|_| Ok(DVector::from_vec(vec![1.0])));

        let engine = RatingEngine::new(Box::new(solver));
        let result = engine.rate(&[game("A", "B", 1, 0)], None);
        assert!(matches!(
            result,
            Err(RatingError::InternalInvariant { .. })
        ));
    }

    #[test]
    fn test_solver_failure_propagates() {
        let mut solver = MockWlsSolver::new();
        solver.expect_solve().returning(|_| {
            Err(RatingError::Unsolvable {
                reason: "degenerate system".to_string(),
            })
        });

        let engine = RatingEngine::new(Box::new(solver));
        let result = engine.rate(&[game("A", "B", 1, 0)], None);
        assert!(matches!(result, Err(RatingError::Unsolvable { .. })));
    }
}
