//! Persisted authentication session.
//!
//! The token and the user profile are two independent storage entries. A
//! session exists exactly when a token is stored; nothing validates expiry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError, load_json, save_json};
use crate::{CineSearchError, Result};

/// Default storage key for the session token.
pub const TOKEN_KEY: &str = "auth_token";
/// Default storage key for the serialized user profile.
pub const USER_KEY: &str = "auth_user";

/// Minimal profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub id: String,
}

impl UserProfile {
    /// Name to greet the user with: the display name when set, else the email.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Token plus profile, created on login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Reads and writes the session through the storage port.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    token_key: String,
    user_key: String,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("token_key", &self.token_key)
            .field("user_key", &self.user_key)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(store, TOKEN_KEY, USER_KEY)
    }

    pub fn with_keys(
        store: Arc<dyn KeyValueStore>,
        token_key: impl Into<String>,
        user_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            token_key: token_key.into(),
            user_key: user_key.into(),
        }
    }

    /// Stored token, if any. Unreadable storage counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.store.get(&self.token_key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    /// Token presence check only: no expiry, no server round-trip.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Stored user profile; malformed entries read as absent.
    pub fn current_user(&self) -> Option<UserProfile> {
        load_json(self.store.as_ref(), &self.user_key)
    }

    /// Returns the current session or `CineSearchError::Unauthenticated`.
    ///
    /// # Errors
    ///
    /// - `CineSearchError::Unauthenticated` - If no token is stored
    pub fn require_authenticated(&self) -> Result<Option<UserProfile>> {
        if self.is_authenticated() {
            Ok(self.current_user())
        } else {
            Err(CineSearchError::Unauthenticated)
        }
    }

    /// Persists `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If either entry could not be written
    pub fn save(&self, session: &Session) -> std::result::Result<(), StorageError> {
        // The token marks the session as live, so it is written last
        let written = save_json(self.store.as_ref(), &self.user_key, &session.user)
            .and_then(|()| self.store.set(&self.token_key, &session.token));

        if let Err(e) = written {
            if let Err(cleanup) = self.clear() {
                tracing::warn!("Failed to discard partial session: {}", cleanup);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Removes both the token and the profile.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If either entry could not be removed
    pub fn clear(&self) -> std::result::Result<(), StorageError> {
        self.store.remove(&self.token_key)?;
        self.store.remove(&self.user_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> Session {
        Session {
            token: "QpwL5tke4Pnpja7X4".to_string(),
            user: UserProfile {
                email: "eve.holt@reqres.in".to_string(),
                name: Some("Eve".to_string()),
                id: "4".to_string(),
            },
        }
    }

    #[test]
    fn test_save_and_clear() {
        let backend = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(backend.clone());
        assert!(!sessions.is_authenticated());
        assert!(sessions.current_user().is_none());

        sessions.save(&session()).unwrap();
        assert!(sessions.is_authenticated());
        assert_eq!(sessions.token().as_deref(), Some("QpwL5tke4Pnpja7X4"));
        assert_eq!(sessions.current_user(), Some(session().user));

        sessions.clear().unwrap();
        assert!(!sessions.is_authenticated());
        assert!(sessions.current_user().is_none());
        assert!(backend.is_empty());
    }

    /// Memory store whose writes to one key fail.
    struct FailingStore {
        inner: MemoryStore,
        failing_key: &'static str,
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            if key == self.failing_key {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn failing_on(failing_key: &'static str) -> Arc<FailingStore> {
        Arc::new(FailingStore {
            inner: MemoryStore::new(),
            failing_key,
        })
    }

    #[test]
    fn test_failed_profile_write_stores_no_token() {
        let backend = failing_on(USER_KEY);
        let sessions = SessionStore::new(backend.clone());

        assert!(sessions.save(&session()).is_err());
        assert!(!sessions.is_authenticated());
        assert_eq!(backend.inner.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_failed_token_write_discards_profile() {
        let backend = failing_on(TOKEN_KEY);
        let sessions = SessionStore::new(backend.clone());

        assert!(sessions.save(&session()).is_err());
        assert!(!sessions.is_authenticated());
        assert!(sessions.current_user().is_none());
        assert!(backend.inner.is_empty());
    }

    #[test]
    fn test_token_alone_is_enough() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(TOKEN_KEY, "abc").unwrap();
        backend.set(USER_KEY, "not json").unwrap();

        let sessions = SessionStore::new(backend);
        assert!(sessions.is_authenticated());
        assert!(sessions.current_user().is_none());
        assert!(sessions.require_authenticated().is_ok());
    }

    #[test]
    fn test_require_authenticated_without_token() {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            sessions.require_authenticated(),
            Err(CineSearchError::Unauthenticated)
        ));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = session().user;
        assert_eq!(user.display_name(), "Eve");

        user.name = None;
        assert_eq!(user.display_name(), "eve.holt@reqres.in");

        user.name = Some("  ".to_string());
        assert_eq!(user.display_name(), "eve.holt@reqres.in");
    }

    #[test]
    fn test_profile_without_name_omits_field() {
        let user = UserProfile {
            email: "a@b.c".to_string(),
            name: None,
            id: "1".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"email":"a@b.c","id":"1"}"#);
    }
}
