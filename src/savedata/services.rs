use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::CoreError;
use crate::savedata::codec::{self, SaveData};
use crate::users::{IdentityStore, UserStore, UserWrite};

/// Export and import of a user's {bio, score}.
#[derive(Clone)]
pub struct SaveDataService {
    identity: IdentityStore,
    store: Arc<dyn UserStore>,
}

impl SaveDataService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            identity: IdentityStore::new(store.clone()),
            store,
        }
    }

    #[instrument(skip(self))]
    pub async fn export(&self, id: Uuid) -> Result<String, CoreError> {
        let user = self.identity.lookup_by_id(id).await?;
        Ok(codec::encode(&SaveData {
            bio: user.bio,
            score: user.clicks,
        }))
    }

    /// Decodes `blob`, then sets bio, clicks and last click in one
    /// transaction. A failing write is reported by name.
    #[instrument(skip(self, blob), fields(blob_len = blob.len()))]
    pub async fn import(&self, id: Uuid, blob: &str) -> Result<SaveData, CoreError> {
        let data = codec::decode(blob)?;
        self.store
            .apply(
                id,
                &[
                    UserWrite::SetBio(data.bio.clone()),
                    UserWrite::SetClicks(data.score),
                    UserWrite::TouchLastClick,
                ],
            )
            .await?;
        info!(user_id = %id, score = data.score, "save data imported");
        Ok(data)
    }
}
