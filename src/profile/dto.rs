use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::User;

/// Landing view after login.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub id: Uuid,
    pub username: String,
    pub clicks: i64,
}

/// The caller's own profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub clicks: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_click: OffsetDateTime,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileForm {
    pub bio: String,
}

impl From<User> for HomeResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            clicks: u.clicks,
        }
    }
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            bio: u.bio,
            clicks: u.clicks,
            last_click: u.last_click,
            is_admin: u.is_admin,
        }
    }
}
