//! Error types for the rating service
//!
//! The engine uses a typed error enum so the HTTP layer can distinguish
//! client mistakes from solver failures and internal bugs. Startup and
//! configuration code uses anyhow as its error currency instead.

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, RatingError>;

/// Errors raised while rating teams or building the prediction curve
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    /// Invalid caller input: missing fields, self-play, negative scores.
    /// Detected before any design matrix is built.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// The weighted least squares system could not be solved, typically
    /// because there are too few informative games for the teams involved.
    #[error("insufficient data to solve ratings: {reason}")]
    Unsolvable { reason: String },

    /// A team requested for prediction never appears in the rated set.
    #[error("unknown team: {team_id}")]
    UnknownTeam { team_id: String },

    /// Builder/solver contract violation. Unreachable on valid input;
    /// indicates a bug rather than a user mistake.
    #[error("internal invariant violated: {message}")]
    InternalInvariant { message: String },
}

impl RatingError {
    /// Whether this error is the caller's fault (maps to a 4xx response)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RatingError::InternalInvariant { .. })
    }
}
