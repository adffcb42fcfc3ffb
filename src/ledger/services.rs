use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::CoreError;
use crate::users::{UserStore, UserWrite};

/// Clicks counter and last-click timestamp of every user.
///
/// Single operations are one statement each. `record_click` and
/// `reset_score` pair the counter write with `touch_last_click` in one
/// transaction; a failure of the second write comes back as
/// `CoreError::PartialFailure` naming it.
#[derive(Clone)]
pub struct ScoreLedger {
    store: Arc<dyn UserStore>,
}

impl ScoreLedger {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn increment(&self, id: Uuid, delta: i64) -> Result<(), CoreError> {
        Ok(self.store.apply(id, &[UserWrite::Increment(delta)]).await?)
    }

    pub async fn reset(&self, id: Uuid) -> Result<(), CoreError> {
        Ok(self.store.apply(id, &[UserWrite::Reset]).await?)
    }

    pub async fn set_absolute(&self, id: Uuid, value: i64) -> Result<(), CoreError> {
        if value < 0 {
            return Err(CoreError::InvalidWrite(format!(
                "clicks cannot be negative (got {value})"
            )));
        }
        Ok(self.store.apply(id, &[UserWrite::SetClicks(value)]).await?)
    }

    pub async fn touch_last_click(&self, id: Uuid) -> Result<(), CoreError> {
        Ok(self.store.apply(id, &[UserWrite::TouchLastClick]).await?)
    }

    #[instrument(skip(self))]
    pub async fn record_click(&self, id: Uuid) -> Result<(), CoreError> {
        self.store
            .apply(id, &[UserWrite::Increment(1), UserWrite::TouchLastClick])
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reset_score(&self, id: Uuid) -> Result<(), CoreError> {
        self.store
            .apply(id, &[UserWrite::Reset, UserWrite::TouchLastClick])
            .await?;
        info!(user_id = %id, "score reset");
        Ok(())
    }
}
