use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::users::IdentityStore;

/// Public view of one ranked user. Never carries email or credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub username: String,
    pub clicks: i64,
}

#[derive(Clone)]
pub struct Leaderboard {
    identity: IdentityStore,
}

impl Leaderboard {
    pub fn new(identity: IdentityStore) -> Self {
        Self { identity }
    }

    pub async fn top_n(&self, n: i64) -> Result<Vec<LeaderboardEntry>, CoreError> {
        let users = self.identity.list_top_by_clicks(n).await?;
        Ok(users
            .into_iter()
            .map(|u| LeaderboardEntry {
                id: u.id,
                username: u.username,
                clicks: u.clicks,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn ties_are_broken_by_id_ascending() {
        let mem = MemoryStore::new();
        let (a, b, c, d) = (
            Uuid::from_u128(0xA),
            Uuid::from_u128(0xB),
            Uuid::from_u128(0xC),
            Uuid::from_u128(0xD),
        );
        // inserted out of order on purpose
        mem.seed(b, "B", "pw", 10);
        mem.seed(d, "D", "pw", 3);
        mem.seed(a, "A", "pw", 10);
        mem.seed(c, "C", "pw", 5);

        let board = Leaderboard::new(IdentityStore::new(Arc::new(mem)));
        let top = board.top_n(3).await.unwrap();

        let ids: Vec<Uuid> = top.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(top[0].username, "A");
        assert_eq!(top[2].clicks, 5);
    }

    #[tokio::test]
    async fn entries_never_serialize_private_fields() {
        let mem = MemoryStore::new();
        mem.seed(Uuid::new_v4(), "alice", "hunter2", 1);

        let board = Leaderboard::new(IdentityStore::new(Arc::new(mem)));
        let json = serde_json::to_string(&board.top_n(5).await.unwrap()).unwrap();

        assert!(json.contains("alice"));
        assert!(!json.contains("email"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }
}
