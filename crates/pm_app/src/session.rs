use std::fmt;
use std::sync::Arc;

use pm_core::{AuthResponse, AuthService, Result, Session, SessionStorage, User};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key of the JSON-serialized [`User`].
pub const USER_KEY: &str = "user";

/// Identity context shared by every component that needs to know who is
/// logged in.
///
/// A session exists iff a token is stored. Login and registration go through
/// the auth service; everything else only touches the storage backend.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    auth: Arc<dyn AuthService>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, auth: Arc<dyn AuthService>) -> Self {
        Self { storage, auth }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Session> {
        let response = self.auth.register(username, email, password).await?;
        tracing::info!("Registered {}", response.user.username);
        self.persist(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let response = self.auth.login(username, password).await?;
        tracing::info!("Logged in as {}", response.user.username);
        self.persist(response).await
    }

    /// Stores token then user. If the user cannot be written the token is
    /// taken back out, so a failed login never leaves a half session.
    async fn persist(&self, response: AuthResponse) -> Result<Session> {
        let user = serde_json::to_string(&response.user)?;
        self.storage.set(TOKEN_KEY, &response.token).await?;
        if let Err(e) = self.storage.set(USER_KEY, &user).await {
            if let Err(rollback) = self.storage.remove(TOKEN_KEY).await {
                tracing::error!("Could not roll back stored token: {}", rollback);
            }
            return Err(e);
        }
        Ok(Session {
            token: response.token,
            user: response.user,
        })
    }

    /// Forgets the token and user. Local only, safe to repeat.
    pub async fn logout(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(USER_KEY).await?;
        tracing::debug!("Session cleared");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        let Some(raw) = self.storage.get(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored user: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn current_token(&self) -> Result<Option<String>> {
        self.storage.get(TOKEN_KEY).await
    }

    /// Token and user together, `None` if either is missing.
    pub async fn current_session(&self) -> Result<Option<Session>> {
        let Some(token) = self.current_token().await? else {
            return Ok(None);
        };
        Ok(self.current_user().await?.map(|user| Session { token, user }))
    }

    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.current_token().await?.is_some())
    }

    pub async fn is_admin(&self) -> Result<bool> {
        Ok(self.current_user().await?.map(|user| user.is_admin).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::{memory_storage, FakeAuth, FlakyStorage};
    use pm_core::{Error, UserId};

    fn store(auth: Arc<FakeAuth>) -> (SessionStore, Arc<pm_storage::InMemoryStorage>) {
        let storage = memory_storage();
        (SessionStore::new(storage.clone(), auth), storage)
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let (store, storage) = store(Arc::new(FakeAuth::new()));
        let session = store.login("officer1", "pw123456").await.unwrap();
        assert_eq!(session.user.id, UserId(1));

        assert!(store.is_authenticated().await.unwrap());
        assert_eq!(store.current_token().await.unwrap(), Some(session.token.clone()));
        assert_eq!(store.current_user().await.unwrap(), Some(session.user.clone()));
        assert_eq!(store.current_session().await.unwrap(), Some(session));
        assert!(storage.get(USER_KEY).await.unwrap().unwrap().contains("officer1"));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_storage_untouched() {
        let (store, storage) = store(Arc::new(FakeAuth::new()));
        let err = store.login("officer1", "nope").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(storage.is_empty().await);
        assert!(!store.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let (store, _) = store(Arc::new(FakeAuth::new()));
        let session = store.register("officer7", "o7@mvd.ru", "secret1").await.unwrap();
        assert_eq!(session.user.username, "officer7");
        store.logout().await.unwrap();

        let err = store.register("officer7", "o7@mvd.ru", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Пользователь уже существует");
        assert!(store.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_local() {
        let auth = Arc::new(FakeAuth::new());
        let (store, _) = store(auth.clone());
        store.logout().await.unwrap();

        store.login("officer1", "pw123456").await.unwrap();
        let calls = auth.calls();
        store.logout().await.unwrap();
        store.logout().await.unwrap();
        assert_eq!(auth.calls(), calls);
        assert!(store.current_user().await.unwrap().is_none());
        assert!(store.current_token().await.unwrap().is_none());
        assert!(store.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_is_admin_follows_stored_flag() {
        let (store, storage) = store(Arc::new(FakeAuth::new()));
        assert!(!store.is_admin().await.unwrap());

        store.login("officer1", "pw123456").await.unwrap();
        assert!(!store.is_admin().await.unwrap());

        store.login("chief", "pw123456").await.unwrap();
        assert!(store.is_admin().await.unwrap());

        storage.set(USER_KEY, "{broken").await.unwrap();
        assert!(!store.is_admin().await.unwrap());
        assert!(store.current_user().await.unwrap().is_none());
        // Token alone still counts as authenticated.
        assert!(store.is_authenticated().await.unwrap());
        assert!(store.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_no_half_session() {
        let storage = Arc::new(FlakyStorage::new());
        let store = SessionStore::new(storage.clone(), Arc::new(FakeAuth::new()));

        storage.fail_key(Some(TOKEN_KEY));
        assert!(matches!(store.login("officer1", "pw123456").await, Err(Error::Storage(_))));
        assert!(!store.is_authenticated().await.unwrap());

        storage.fail_key(Some(USER_KEY));
        assert!(matches!(store.login("officer1", "pw123456").await, Err(Error::Storage(_))));
        assert!(!store.is_authenticated().await.unwrap());
        assert!(store.current_user().await.unwrap().is_none());

        storage.fail_key(None);
        store.login("officer1", "pw123456").await.unwrap();
        assert!(store.current_session().await.unwrap().is_some());
    }
}
