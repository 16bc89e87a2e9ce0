//! Session Module
//!
//! Holds the authenticated identity and bearer token, and keeps the
//! persisted copy in sync. The user and token are always set or cleared
//! together; a half-written session is never observable.

use serde::{Deserialize, Serialize};
use tracing::{info, warn, debug};

use crate::storage::{ClientStorage, StorageError};

/// Storage key for the serialized user object
pub const USER_KEY: &str = "user";
/// Storage key for the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// Role granted to an account by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Parse the uppercase role name used on the wire.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// The signed-in user, as persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub email: String,
    pub role: Role,
}

/// Authoritative record of who is logged in
pub struct SessionStore {
    user: Option<UserSummary>,
    token: Option<String>,
    loading: bool,
}

impl SessionStore {
    /// Create an empty store; `loading` stays set until [`load`](Self::load) runs
    pub fn new() -> Self {
        Self {
            user: None,
            token: None,
            loading: true,
        }
    }

    /// Rehydrate the session from storage. Runs once at startup; corrupted
    /// entries are wiped and the store comes up logged out.
    pub fn load(&mut self, storage: &ClientStorage) {
        debug!("Loading persisted session");

        if storage.exists(USER_KEY) && storage.exists(TOKEN_KEY) {
            match (storage.load::<UserSummary>(USER_KEY), storage.load_raw(TOKEN_KEY)) {
                (Ok(user), Ok(token)) => {
                    info!("Session restored for user: {}", user.email);
                    self.user = Some(user);
                    self.token = Some(token);
                }
                _ => {
                    warn!("Persisted session is unreadable, clearing it");
                    let _ = storage.delete(USER_KEY);
                    let _ = storage.delete(TOKEN_KEY);
                    self.user = None;
                    self.token = None;
                }
            }
        } else {
            debug!("No persisted session found");
            self.user = None;
            self.token = None;
        }

        self.loading = false;
    }

    /// Persist and set both session fields. On a persistence failure the
    /// in-memory state is left untouched and any partial entry is removed.
    pub fn login(
        &mut self,
        user: UserSummary,
        token: String,
        storage: &ClientStorage,
    ) -> Result<(), StorageError> {
        storage.save(USER_KEY, &user)?;
        if let Err(e) = storage.save_raw(TOKEN_KEY, &token) {
            let _ = storage.delete(USER_KEY);
            return Err(e);
        }

        info!("Session set for user: {}", user.email);
        self.user = Some(user);
        self.token = Some(token);
        Ok(())
    }

    /// Clear both persisted entries and the in-memory fields
    pub fn logout(&mut self, storage: &ClientStorage) {
        if storage.delete(USER_KEY).is_err() || storage.delete(TOKEN_KEY).is_err() {
            warn!("Failed to delete a persisted session entry");
        }

        info!("Session cleared");
        self.user = None;
        self.token = None;
    }

    /// Check if currently authenticated
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// True until the startup load attempt has completed
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Get the current user if logged in
    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    /// Get the bearer token if logged in
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Get the current user's role if logged in
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
