use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,             // unique, case-sensitive
    pub email: String,
    pub bio: String,
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub clicks: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_click: OffsetDateTime,
    pub is_admin: bool,
}

/// One single-statement mutation of a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWrite {
    Increment(i64),
    Reset,
    SetClicks(i64),
    TouchLastClick,
    SetBio(String),
}

impl UserWrite {
    pub fn name(&self) -> &'static str {
        match self {
            UserWrite::Increment(_) => "increment",
            UserWrite::Reset => "reset",
            UserWrite::SetClicks(_) => "set_clicks",
            UserWrite::TouchLastClick => "touch_last_click",
            UserWrite::SetBio(_) => "update_bio",
        }
    }
}
