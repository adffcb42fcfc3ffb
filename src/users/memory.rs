use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::error::{StoreError, WriteFailure};
use crate::users::repo::UserStore;
use crate::users::repo_types::{User, UserWrite};

/// In-process `UserStore`. Batches are applied to a copy of the row and
/// committed only if every write succeeds.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    fault: Arc<Mutex<Option<(&'static str, fn() -> StoreError)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        let mut users = self.users.lock().unwrap();
        assert!(
            users
                .values()
                .all(|u| u.id == user.id || u.username != user.username),
            "duplicate username {}",
            user.username
        );
        users.insert(user.id, user);
    }

    /// Seeds a user whose password is `password`.
    pub fn seed(&self, id: Uuid, username: &str, password: &str, clicks: i64) -> User {
        let user = User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            bio: String::new(),
            password_hash: hash_password(password).expect("hash password"),
            clicks,
            last_click: OffsetDateTime::UNIX_EPOCH,
            is_admin: false,
        };
        self.insert(user.clone());
        user
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Makes every later write named `step` fail with `error()`.
    pub fn fail_on(&self, step: &'static str, error: fn() -> StoreError) {
        *self.fault.lock().unwrap() = Some((step, error));
    }
}

fn apply_one(user: &mut User, write: &UserWrite) -> Result<(), StoreError> {
    match write {
        UserWrite::Increment(delta) => {
            user.clicks = user
                .clicks
                .checked_add(*delta)
                .filter(|c| *c >= 0)
                .ok_or_else(|| StoreError::Constraint("clicks must be >= 0".into()))?;
        }
        UserWrite::Reset => user.clicks = 0,
        UserWrite::SetClicks(value) => {
            if *value < 0 {
                return Err(StoreError::Constraint("clicks must be >= 0".into()));
            }
            user.clicks = *value;
        }
        UserWrite::TouchLastClick => {
            user.last_click = user.last_click.max(OffsetDateTime::now_utc());
        }
        UserWrite::SetBio(bio) => user.bio = bio.clone(),
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.get(id))
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        let mut all: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.clicks.cmp(&a.clicks).then(a.id.cmp(&b.id)));
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }

    async fn apply(&self, id: Uuid, writes: &[UserWrite]) -> Result<(), WriteFailure> {
        let fault = *self.fault.lock().unwrap();
        let mut users = self.users.lock().unwrap();
        let mut row = users.get(&id).cloned();

        for (index, write) in writes.iter().enumerate() {
            let failure = |source: StoreError| WriteFailure {
                index,
                step: write.name(),
                source,
            };
            if let Some((_, error)) = fault.filter(|(step, _)| *step == write.name()) {
                return Err(failure(error()));
            }
            let user = row.as_mut().ok_or_else(|| failure(StoreError::NotFound))?;
            apply_one(user, write).map_err(failure)?;
        }

        if let Some(user) = row {
            users.insert(id, user);
        }
        Ok(())
    }
}
