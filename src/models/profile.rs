use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maps an authenticated identity to its administrative-privilege flag.
/// Owned by the identity collaborator; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}
