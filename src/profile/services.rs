use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::CoreError;
use crate::users::{UserStore, UserWrite};

#[derive(Clone)]
pub struct ProfileEditor {
    store: Arc<dyn UserStore>,
}

impl ProfileEditor {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Replaces the bio. The text goes to the store as data, never as SQL.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn update_bio(&self, id: Uuid, text: &str) -> Result<(), CoreError> {
        self.store
            .apply(id, &[UserWrite::SetBio(text.to_owned())])
            .await?;
        info!(user_id = %id, "bio updated");
        Ok(())
    }
}
