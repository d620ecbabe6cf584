/// Factory: build `Authenticator` from application `Config`.
use std::sync::Arc;

use url::Url;

use crate::bootstrap::BootstrapError;
use crate::config::AuthSettings;
use crate::services::auth::{Authenticator, AuthenticatorSettings, HttpJwksSource};

pub fn build_authenticator(settings: &AuthSettings) -> Result<Authenticator, BootstrapError> {
    let jwks_url = Url::parse(&settings.jwks_url).map_err(BootstrapError::InvalidJwksUrl)?;
    let source = HttpJwksSource::new(jwks_url, settings.jwks_fetch_timeout)
        .map_err(BootstrapError::HttpClient)?;

    let auth = Authenticator::new(
        AuthenticatorSettings {
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            leeway_seconds: settings.leeway_seconds,
            jwks_fetch_timeout: settings.jwks_fetch_timeout,
        },
        Arc::new(source),
    );

    Ok(auth)
}
