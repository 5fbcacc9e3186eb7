//! Utility functions for the rating service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a correlation id for one prediction request
pub fn generate_request_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round to two decimal places, the precision of the wire format
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
