use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::CoreError;
use crate::users::repo::UserStore;
use crate::users::repo_types::User;

/// Read side of the user collection.
#[derive(Clone)]
pub struct IdentityStore {
    store: Arc<dyn UserStore>,
}

impl IdentityStore {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// `None` when no user has this exact (case-sensitive) username.
    #[instrument(skip(self))]
    pub async fn lookup_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        Ok(self.store.find_by_username(username).await?)
    }

    #[instrument(skip(self))]
    pub async fn lookup_by_id(&self, id: Uuid) -> Result<User, CoreError> {
        match self.store.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => {
                debug!(user_id = %id, "no user with this id");
                Err(CoreError::NotFound)
            }
        }
    }

    pub async fn list_top_by_clicks(&self, n: i64) -> Result<Vec<User>, CoreError> {
        if n <= 0 {
            return Ok(Vec::new());
        }
        Ok(self.store.top_by_clicks(n).await?)
    }
}
