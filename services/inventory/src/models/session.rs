//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side session bound to a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier handed to the client in a cookie
    pub id: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session with a random identifier
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }
}
