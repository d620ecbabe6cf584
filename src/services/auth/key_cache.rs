//! Process-wide cache of the identity provider's signing keys.
//!
//! Readers take a cheap `Arc` snapshot under a short read lock; a refresh
//! builds a complete `SigningKeySet` off to the side and swaps it in, so a
//! verification never observes a half-updated set. Refreshes are serialized
//! (single-flight): tasks that missed on the same snapshot share one fetch.
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::services::auth::error::{AuthError, UpstreamError};
use crate::services::auth::jwks::{JwksSource, SigningKeySet, VerificationKey};

pub struct SigningKeyCache {
    source: Arc<dyn JwksSource>,
    current: RwLock<Arc<SigningKeySet>>,
    // Held for the duration of a refresh.
    refreshing: Mutex<()>,
    fetch_timeout: Duration,
}

impl std::fmt::Debug for SigningKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyCache")
            .field("source", &self.source.describe())
            .field("current", &*self.snapshot())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl SigningKeyCache {
    pub fn new(source: Arc<dyn JwksSource>, fetch_timeout: Duration) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(SigningKeySet::default())),
            refreshing: Mutex::new(()),
            fetch_timeout,
        }
    }

    pub fn snapshot(&self) -> Arc<SigningKeySet> {
        self.current.read().clone()
    }

    /// Resolves `kid`, refreshing the set at most once if it is not cached.
    pub async fn resolve(&self, kid: &str) -> Result<VerificationKey, AuthError> {
        let seen = self.snapshot();
        if let Some(key) = seen.get(kid) {
            return Ok(key.clone());
        }

        tracing::debug!(kid, generation = seen.generation(), "signing key cache miss");

        let refreshed = self.refresh_after(&seen).await;
        refreshed.get(kid).cloned().ok_or(AuthError::UnknownKey)
    }

    /// Unconditional fetch, e.g. to warm the cache at startup.
    pub async fn refresh(&self) -> Result<Arc<SigningKeySet>, UpstreamError> {
        let _guard = self.refreshing.lock().await;
        self.fetch_and_swap().await
    }

    // Returns the set to retry against. Falls back to the current set when the
    // fetch fails.
    async fn refresh_after(&self, seen: &SigningKeySet) -> Arc<SigningKeySet> {
        let _guard = self.refreshing.lock().await;

        let current = self.snapshot();
        if current.generation() != seen.generation() {
            // another task refreshed while we waited for the lock
            return current;
        }

        match self.fetch_and_swap().await {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %err,
                    "jwks refresh failed"
                );
                current
            }
        }
    }

    async fn fetch_and_swap(&self) -> Result<Arc<SigningKeySet>, UpstreamError> {
        let jwks = tokio::time::timeout(self.fetch_timeout, self.source.fetch())
            .await
            .map_err(|_| UpstreamError::Timeout(self.fetch_timeout))??;

        let generation = self.snapshot().generation() + 1;
        let next = Arc::new(SigningKeySet::from_jwks(&jwks, generation));
        *self.current.write() = next.clone();

        tracing::info!(
            source = %self.source.describe(),
            keys = next.len(),
            generation,
            "jwks refreshed"
        );

        Ok(next)
    }
}
