//! One-time construction of the process-wide `ServiceHandle`.
//!
//! - `initialize`: connect storage, build the authenticator, warm the key cache
//! - `Bootstrap`: run an initializer at most once, bounded by a deadline
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::services::{auth::build_authenticator, db};
use crate::state::ServiceHandle;

/// Startup failure. Fatal: the process does not start serving.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("storage connection failed: {0}")]
    Storage(#[source] sqlx::Error),
    #[error("invalid jwks url: {0}")]
    InvalidJwksUrl(#[source] url::ParseError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("bootstrap did not complete within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Build the shared handle from config.
pub async fn initialize(config: &Config) -> Result<ServiceHandle, BootstrapError> {
    let db = db::connect(
        &config.database_url,
        config.database_max_connections,
        config.bootstrap_timeout,
    )
    .await
    .map_err(BootstrapError::Storage)?;

    let auth = build_authenticator(&config.auth)?;

    // Not fatal: keys are fetched again on the first unknown kid.
    match auth.prefetch_keys().await {
        Ok(count) => tracing::info!(keys = count, "signing keys loaded"),
        Err(err) => tracing::warn!(error = %err, "signing key prefetch failed"),
    }

    Ok(ServiceHandle::new(db, Arc::new(auth)))
}

/// Holds the `ServiceHandle` once built.
///
/// Concurrent first callers wait on the same construction and all receive the
/// same `Arc`. A failed attempt leaves the cell empty.
#[derive(Debug)]
pub struct Bootstrap {
    cell: OnceCell<Arc<ServiceHandle>>,
    deadline: Duration,
}

impl Bootstrap {
    pub fn new(deadline: Duration) -> Self {
        Self {
            cell: OnceCell::new(),
            deadline,
        }
    }

    pub fn get(&self) -> Option<Arc<ServiceHandle>> {
        self.cell.get().cloned()
    }

    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<Arc<ServiceHandle>, BootstrapError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ServiceHandle, BootstrapError>>,
    {
        let deadline = self.deadline;

        self.cell
            .get_or_try_init(|| async move {
                match tokio::time::timeout(deadline, init()).await {
                    Ok(result) => result.map(Arc::new),
                    Err(_) => Err(BootstrapError::DeadlineExceeded(deadline)),
                }
            })
            .await
            .cloned()
    }
}
