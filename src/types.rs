//! Common types used throughout the rating service

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for teams
pub type TeamId = String;

/// Optional prior strength estimates, in rating points (RP), keyed by team.
/// Teams present here receive a low-weight virtual anchor game; teams absent
/// are rated purely from observed games.
pub type Seeding = HashMap<TeamId, f64>;

/// Rating for every team that appeared in the supplied games. Values are
/// relative: only the difference between two teams is meaningful, as a
/// predicted score differential.
pub type RatingTable = HashMap<TeamId, f64>;

/// One completed contest between two teams.
///
/// Scores are stored signed because the prediction sweep injects synthetic
/// games whose home score can be negative; caller-supplied games must carry
/// non-negative scores and are checked by [`Game::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "th")]
    pub home_team: TeamId,
    #[serde(rename = "ta")]
    pub away_team: TeamId,
    #[serde(rename = "sh")]
    pub home_score: i64,
    #[serde(rename = "sa")]
    pub away_score: i64,
}

impl Game {
    /// Create a game record without validation (used for synthetic rows)
    pub fn new(
        home_team: impl Into<TeamId>,
        away_team: impl Into<TeamId>,
        home_score: i64,
        away_score: i64,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score,
            away_score,
        }
    }

    /// Home score minus away score
    pub fn differential(&self) -> f64 {
        (self.home_score - self.away_score) as f64
    }

    /// Check the constraints caller-supplied games must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.home_team == self.away_team {
            return Err(RatingError::MalformedInput {
                reason: format!(
                    "game lists the same team '{}' as both home and away",
                    self.home_team
                ),
            });
        }
        if self.home_score < 0 || self.away_score < 0 {
            return Err(RatingError::MalformedInput {
                reason: format!(
                    "negative score in game {} vs {} ({} to {})",
                    self.home_team, self.away_team, self.home_score, self.away_score
                ),
            });
        }
        Ok(())
    }
}

/// Validate a caller-supplied game list before any matrix work happens
pub fn validate_games(games: &[Game]) -> Result<()> {
    if games.is_empty() {
        return Err(RatingError::MalformedInput {
            reason: "game list is empty".to_string(),
        });
    }
    for game in games {
        game.validate()?;
    }
    Ok(())
}

/// Validate seeding values; JSON cannot express NaN but other callers can
pub fn validate_seeding(seeding: &Seeding) -> Result<()> {
    for (team, rp) in seeding {
        if !rp.is_finite() {
            return Err(RatingError::MalformedInput {
                reason: format!("non-finite seeding value for team '{}'", team),
            });
        }
    }
    Ok(())
}

/// Request body for the prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Home team of the hypothetical matchup
    #[serde(rename = "th")]
    pub home_team: TeamId,
    /// Away team of the hypothetical matchup
    #[serde(rename = "ta")]
    pub away_team: TeamId,
    /// Observed games to rate from
    pub games: Vec<Game>,
    /// Optional seeding priors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeding: Option<Seeding>,
}

/// One sample of the prediction curve: a hypothetical score differential and
/// the rating movement it would cause for each of the two teams, rounded to
/// two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    #[serde(rename = "d")]
    pub differential: i64,
    #[serde(rename = "dh")]
    pub home_delta: f64,
    #[serde(rename = "da")]
    pub away_delta: f64,
}
