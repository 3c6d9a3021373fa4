use std::fmt;
use std::sync::{Arc, Mutex};

use crate::common::AuthToken;
use crate::error::ClientResult;

/// Read/write access to the single persisted token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// Token store that lives as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// Session context shared by the API client and the views.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Current token; empty stored values are treated as signed out.
    pub fn token(&self) -> Option<AuthToken> {
        self.store
            .load()
            .filter(|raw| !raw.is_empty())
            .map(AuthToken::new)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn store(&self, token: &AuthToken) -> ClientResult<()> {
        self.store.save(token.as_str())?;
        log::info!("Session token stored");
        Ok(())
    }

    pub fn sign_out(&self) -> ClientResult<()> {
        self.store.clear()?;
        log::info!("Session token cleared");
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
