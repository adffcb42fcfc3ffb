use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgQueryResult},
    query::Query,
    Executor, PgPool, Postgres,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{StoreError, WriteFailure};
use crate::users::repo_types::{User, UserWrite};

/// Persistent user collection shared by every request.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Clicks descending, ties by id ascending.
    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<User>, StoreError>;
    /// Applies `writes` in order. Two or more writes commit together or not at all.
    async fn apply(&self, id: Uuid, writes: &[UserWrite]) -> Result<(), WriteFailure>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout),
        }
    }

    async fn write_one<'c, E>(&self, exec: E, id: Uuid, write: &UserWrite) -> Result<(), StoreError>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let done = self.bounded(execute_write(exec, id, write)).await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Every value is a bound parameter; nothing is spliced into the SQL text.
async fn execute_write<'c, E>(
    exec: E,
    id: Uuid,
    write: &UserWrite,
) -> Result<PgQueryResult, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query: Query<'static, Postgres, PgArguments> = match write {
        UserWrite::Increment(delta) => {
            sqlx::query("UPDATE users SET clicks = clicks + $2 WHERE id = $1")
                .bind(id)
                .bind(*delta)
        }
        UserWrite::Reset => sqlx::query("UPDATE users SET clicks = 0 WHERE id = $1").bind(id),
        UserWrite::SetClicks(value) => sqlx::query("UPDATE users SET clicks = $2 WHERE id = $1")
            .bind(id)
            .bind(*value),
        UserWrite::TouchLastClick => sqlx::query(
            "UPDATE users SET last_click = GREATEST(last_click, CURRENT_TIMESTAMP) WHERE id = $1",
        )
        .bind(id),
        UserWrite::SetBio(bio) => sqlx::query("UPDATE users SET bio = $2 WHERE id = $1")
            .bind(id)
            .bind(bio.clone()),
    };
    exec.execute(query).await
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, bio, password_hash, clicks, last_click, is_admin
                FROM users
                WHERE username = $1
                "#,
            )
            .bind(username)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, bio, password_hash, clicks, last_click, is_admin
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, bio, password_hash, clicks, last_click, is_admin
                FROM users
                ORDER BY clicks DESC, id ASC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn apply(&self, id: Uuid, writes: &[UserWrite]) -> Result<(), WriteFailure> {
        match writes {
            [] => Ok(()),
            [single] => self
                .write_one(&self.pool, id, single)
                .await
                .map_err(|source| WriteFailure {
                    index: 0,
                    step: single.name(),
                    source,
                }),
            _ => {
                let mut tx = self
                    .bounded(self.pool.begin())
                    .await
                    .map_err(|source| WriteFailure {
                        index: 0,
                        step: "begin",
                        source,
                    })?;

                for (index, write) in writes.iter().enumerate() {
                    if let Err(source) = self.write_one(&mut *tx, id, write).await {
                        warn!(user_id = %id, step = write.name(), error = %source, "write failed, rolling back");
                        // A timed-out statement may still hold the connection; dropping
                        // the transaction rolls it back when the connection is released.
                        if matches!(source, StoreError::Timeout) {
                            drop(tx);
                        } else if let Err(e) = self.bounded(tx.rollback()).await {
                            warn!(user_id = %id, error = %e, "rollback failed");
                        }
                        return Err(WriteFailure {
                            index,
                            step: write.name(),
                            source,
                        });
                    }
                }

                self.bounded(tx.commit())
                    .await
                    .map_err(|source| WriteFailure {
                        index: writes.len(),
                        step: "commit",
                        source,
                    })?;
                debug!(user_id = %id, writes = writes.len(), "write batch committed");
                Ok(())
            }
        }
    }
}
