// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the Mergington activities front-end and server.
//! This module defines the JSON shapes of the activities HTTP API.

use serde::{Deserialize, Serialize};

/// Email address identifying a student
pub type Email = String;

/// One extracurricular activity as rendered by `GET /activities`.
///
/// The activity name is not part of the record; it is the key of the
/// surrounding JSON object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Free-text description
    pub description: String,
    /// Free-text schedule, e.g. "Fridays, 3:30 PM - 5:00 PM"
    pub schedule: String,
    /// Advertised capacity
    pub max_participants: u32,
    /// Signed-up students, in sign-up order
    #[serde(default)]
    pub participants: Vec<Email>,
}

impl Activity {
    /// Whether `email` is already on the roster
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    /// Whether the roster has reached `max_participants`
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }
}

/// Query string of `POST`/`DELETE /activities/{name}/signup`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignupQuery {
    /// Student email to add or remove
    pub email: Email,
}

/// Successful mutation response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Error response body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub detail: String,
}
