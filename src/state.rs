/*
 * Responsibility
 * - 起動時に 1 回だけ組み立てる共有ハンドル (ServiceHandle: db + authenticator)
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::AuthSettings;
use crate::services::auth::Authenticator;

/// Long-lived dependencies shared by every request. Never mutated after
/// construction.
#[derive(Debug)]
pub struct ServiceHandle {
    pub db: sqlx::PgPool,
    pub auth: Arc<Authenticator>,
}

impl ServiceHandle {
    pub fn new(db: sqlx::PgPool, auth: Arc<Authenticator>) -> Self {
        Self { db, auth }
    }
}

/// What the login endpoint needs to build an authorize URL.
#[derive(Debug, Clone)]
pub struct LoginSettings {
    pub domain: String,
    pub audience: String,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
}

impl From<&AuthSettings> for LoginSettings {
    fn from(auth: &AuthSettings) -> Self {
        Self {
            domain: auth.domain.clone(),
            audience: auth.audience.clone(),
            client_id: auth.client_id.clone(),
            redirect_uri: auth.redirect_uri.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub services: Arc<ServiceHandle>,
    pub login: Arc<LoginSettings>,
}

impl AppState {
    pub fn new(services: Arc<ServiceHandle>, login: LoginSettings) -> Self {
        Self {
            services,
            login: Arc::new(login),
        }
    }

    pub fn db(&self) -> &sqlx::PgPool {
        &self.services.db
    }

    pub fn auth(&self) -> &Authenticator {
        &self.services.auth
    }
}
