//! services/client/src/services/token.rs
//!
//! The process-wide bearer token: read by every in-flight request, written only
//! by login, logout and forced re-authentication. Last write wins.

use async_trait::async_trait;
use floripedia_core::domain::Token;
use floripedia_core::ports::{AuthProvider, KeyValueStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Storage key of the persisted token.
pub const TOKEN_KEY: &str = "id_token";

pub struct TokenStore {
    current: RwLock<Option<Token>>,
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Restores the token persisted by a previous run, if any.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let restored = match storage.get(TOKEN_KEY) {
            Ok(Some(bytes)) => String::from_utf8(bytes)
                .ok()
                .filter(|raw| !raw.is_empty())
                .map(Token::new),
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read the stored token: {}", e);
                None
            }
        };
        if restored.is_some() {
            info!("Restored a stored session token");
        }
        Self {
            current: RwLock::new(restored),
            storage,
        }
    }

    /// Sets the token after a successful login and persists it.
    pub async fn set(&self, token: Token) {
        if let Err(e) = self.storage.put(TOKEN_KEY, token.as_str().as_bytes()) {
            warn!("Could not persist the session token: {}", e);
        }
        *self.current.write().await = Some(token);
    }

    /// Drops the token from memory and storage.
    pub async fn clear(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!("Could not remove the stored session token: {}", e);
        }
        *self.current.write().await = None;
    }
}

#[async_trait]
impl AuthProvider for TokenStore {
    async fn current_token(&self) -> Option<Token> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    #[tokio::test]
    async fn set_persists_and_restore_reads_back() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let tokens = TokenStore::restore(storage.clone());
        assert!(!tokens.is_logged_in().await);

        tokens.set(Token::new("abc")).await;
        assert!(tokens.is_logged_in().await);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), Some(b"abc".to_vec()));

        let restarted = TokenStore::restore(storage.clone());
        assert_eq!(restarted.current_token().await, Some(Token::new("abc")));
    }

    #[tokio::test]
    async fn clear_removes_everywhere() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let tokens = TokenStore::restore(storage.clone());
        tokens.set(Token::new("abc")).await;
        tokens.clear().await;

        assert_eq!(tokens.current_token().await, None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let tokens = TokenStore::restore(Arc::new(MemoryStore::new()));
        tokens.set(Token::new("old")).await;
        tokens.set(Token::new("refreshed")).await;
        assert_eq!(tokens.current_token().await, Some(Token::new("refreshed")));
    }
}
