use tracing::{error, instrument, warn};

use crate::{
    auth::password::verify_password,
    error::CoreError,
    users::{IdentityStore, User},
};

/// Checks a username/password pair. `Ok(None)` covers an unknown username,
/// a wrong password and an unreadable stored hash so callers cannot tell
/// them apart.
#[instrument(skip(identity, password))]
pub async fn authenticate(
    identity: &IdentityStore,
    username: &str,
    password: &str,
) -> Result<Option<User>, CoreError> {
    let Some(user) = identity.lookup_by_username(username).await? else {
        warn!("login unknown username");
        return Ok(None);
    };

    if user.username.is_empty() || user.username != username {
        return Ok(None);
    }

    match verify_password(password, &user.password_hash) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => {
            warn!(user_id = %user.id, "login invalid password");
            Ok(None)
        }
        Err(e) => {
            error!(error = %e, user_id = %user.id, "stored password hash unreadable");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::MemoryStore;
    use std::sync::Arc;
    use uuid::Uuid;

    fn identity_with_alice() -> (MemoryStore, IdentityStore, Uuid) {
        let mem = MemoryStore::new();
        let id = Uuid::new_v4();
        mem.seed(id, "alice", "wonderland", 0);
        (mem.clone(), IdentityStore::new(Arc::new(mem)), id)
    }

    #[tokio::test]
    async fn correct_credentials_resolve_the_user() {
        let (_, identity, id) = identity_with_alice();
        let user = authenticate(&identity, "alice", "wonderland")
            .await
            .unwrap()
            .expect("logged in");
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (_, identity, _) = identity_with_alice();
        assert!(authenticate(&identity, "alice", "looking-glass")
            .await
            .unwrap()
            .is_none());
        assert!(authenticate(&identity, "mad-hatter", "wonderland")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn plaintext_stored_password_never_matches() {
        let (mem, identity, id) = identity_with_alice();
        let mut user = mem.get(id).unwrap();
        user.password_hash = "wonderland".into();
        mem.insert(user);

        // same answer as an unknown username
        assert!(authenticate(&identity, "alice", "wonderland")
            .await
            .unwrap()
            .is_none());
    }
}
