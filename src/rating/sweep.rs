//! Prediction sweep
//!
//! Builds an empirical sensitivity curve for a hypothetical matchup: for a
//! grid of future score differentials centered on the current rating
//! difference, re-rate the league with one synthetic game added and record
//! how far each of the two teams' ratings move.

use crate::error::{RatingError, Result};
use crate::types::{validate_games, validate_seeding, Game, RatingTable, Seeding, SweepPoint, TeamId};
use crate::rating::engine::RatingEngine;
use crate::utils::round_to_hundredths;
use tracing::debug;

/// Sweep offsets span `-SWEEP_SPAN..=SWEEP_SPAN` around the rounded
/// baseline differential.
pub const SWEEP_SPAN: i64 = 300;

/// Distance between adjacent sweep offsets
pub const SWEEP_STEP: i64 = 25;

/// Orchestrates repeated [`RatingEngine`] solves over synthetic
/// perturbations of the game list.
pub struct PredictionSweep<'a> {
    engine: &'a RatingEngine,
}

impl<'a> PredictionSweep<'a> {
    pub fn new(engine: &'a RatingEngine) -> Self {
        Self { engine }
    }

    /// Produce the prediction curve for a hypothetical home/away matchup.
    ///
    /// Runs one baseline solve plus one solve per sweep offset, each
    /// against a fresh copy of the game list with a single synthetic game
    /// appended; the caller's list is never mutated and no state carries
    /// over between sweep points.
    pub fn sweep(
        &self,
        games: &[Game],
        seeding: Option<&Seeding>,
        home_team: &TeamId,
        away_team: &TeamId,
    ) -> Result<Vec<SweepPoint>> {
        validate_games(games)?;
        if let Some(seeding) = seeding {
            validate_seeding(seeding)?;
        }

        let baseline = self.engine.rate(games, seeding)?;
        let home_rp = lookup(&baseline, home_team)?;
        let away_rp = lookup(&baseline, away_team)?;
        let base_diff = (home_rp - away_rp).round() as i64;

        debug!(
            home = %home_team,
            away = %away_team,
            base_diff,
            "starting prediction sweep"
        );

        let mut curve = Vec::with_capacity((2 * SWEEP_SPAN / SWEEP_STEP + 1) as usize);
        let mut offset = -SWEEP_SPAN;
        while offset <= SWEEP_SPAN {
            let target_diff = base_diff + offset;

            // Synthetic game: the hypothetical result as a home score
            // differential against zero. Appended to a fresh copy so the
            // caller's list and later iterations are unaffected.
            let mut augmented = games.to_vec();
            augmented.push(Game::new(
                home_team.clone(),
                away_team.clone(),
                target_diff,
                0,
            ));

            let perturbed = self.engine.rate(&augmented, seeding)?;
            curve.push(SweepPoint {
                differential: target_diff,
                home_delta: round_to_hundredths(lookup(&perturbed, home_team)? - home_rp),
                away_delta: round_to_hundredths(lookup(&perturbed, away_team)? - away_rp),
            });

            offset += SWEEP_STEP;
        }

        Ok(curve)
    }
}

fn lookup(ratings: &RatingTable, team: &TeamId) -> Result<f64> {
    ratings
        .get(team)
        .copied()
        .ok_or_else(|| RatingError::UnknownTeam {
            team_id: team.clone(),
        })
}
