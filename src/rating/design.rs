//! Regression design matrix construction
//!
//! Turns a list of games (plus optional seeding anchors) into a weighted
//! least squares problem: one response entry per real or virtual game, one
//! regressor column per team, one weight per row.

use crate::error::{RatingError, Result};
use crate::types::{Game, Seeding, TeamId};
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;

/// Margins beyond this are down-weighted so a single blowout cannot
/// dominate the fit the way squared residuals would otherwise allow.
pub const DIFFERENTIAL_CAP: f64 = 200.0;

/// Weight of a virtual seeding game relative to a real game's weight of 1.
/// Low enough that seeding nudges the fit without dominating it.
pub const SEEDING_WEIGHT: f64 = 0.25;

/// Assembled weighted least squares problem
#[derive(Debug, Clone)]
pub struct RegressionProblem {
    /// Distinct teams in first-appearance order; fixes the column order of
    /// the regressor matrix.
    pub team_index: Vec<TeamId>,
    /// Response vector Y: score differential per real game, seeding RP per
    /// virtual game.
    pub response: DVector<f64>,
    /// Regressor matrix X: rows are games, columns are teams. Real rows hold
    /// +1 (home) and -1 (away); virtual rows hold a single +1.
    pub regressors: DMatrix<f64>,
    /// Observation weight per row
    pub weights: DVector<f64>,
}

/// Builds regression problems from game records
pub struct DesignMatrixBuilder;

impl DesignMatrixBuilder {
    /// Assemble the regression problem for a game list and optional seeding.
    ///
    /// Games must be non-empty and each must name two distinct teams; score
    /// signs are not checked here so the sweep can inject synthetic games
    /// with negative differentials.
    pub fn build(games: &[Game], seeding: Option<&Seeding>) -> Result<RegressionProblem> {
        if games.is_empty() {
            return Err(RatingError::MalformedInput {
                reason: "cannot build a design matrix from an empty game list".to_string(),
            });
        }

        // First-seen-wins team index, home team before away team.
        let mut team_index: Vec<TeamId> = Vec::new();
        let mut columns: HashMap<TeamId, usize> = HashMap::new();
        for game in games {
            if game.home_team == game.away_team {
                return Err(RatingError::MalformedInput {
                    reason: format!(
                        "game lists the same team '{}' as both home and away",
                        game.home_team
                    ),
                });
            }
            for team in [&game.home_team, &game.away_team] {
                if !columns.contains_key(team) {
                    columns.insert(team.clone(), team_index.len());
                    team_index.push(team.clone());
                }
            }
        }

        let n_teams = team_index.len();
        let mut response: Vec<f64> = Vec::with_capacity(games.len());
        let mut weights: Vec<f64> = Vec::with_capacity(games.len());
        let mut rows: Vec<f64> = Vec::with_capacity(games.len() * n_teams);

        for game in games {
            response.push(game.differential());

            let mut row = vec![0.0; n_teams];
            row[columns[&game.home_team]] = 1.0;
            row[columns[&game.away_team]] = -1.0;
            rows.extend_from_slice(&row);

            // Ties fall through to weight 1; the division is never reached
            // for d = 0 because 0 > DIFFERENTIAL_CAP is false.
            let d = game.differential().abs();
            weights.push(if d > DIFFERENTIAL_CAP {
                DIFFERENTIAL_CAP / d
            } else {
                1.0
            });
        }

        // Virtual anchor games: each seeded team "plays" a zero-rated
        // virtual opponent, scoring its seeding RP.
        if let Some(seeding) = seeding {
            for (col, team) in team_index.iter().enumerate() {
                if let Some(&rp) = seeding.get(team) {
                    response.push(rp);
                    let mut row = vec![0.0; n_teams];
                    row[col] = 1.0;
                    rows.extend_from_slice(&row);
                    weights.push(SEEDING_WEIGHT);
                }
            }
        }

        let n_rows = response.len();
        Ok(RegressionProblem {
            team_index,
            response: DVector::from_vec(response),
            regressors: DMatrix::from_row_slice(n_rows, n_teams, &rows),
            weights: DVector::from_vec(weights),
        })
    }
}
