use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::Validation;
use serde_json::{Map, Value};

use crate::services::auth::error::{AuthError, MalformedReason, UpstreamError};
use crate::services::auth::identity::AuthenticatedIdentity;
use crate::services::auth::jwks::JwksSource;
use crate::services::auth::key_cache::SigningKeyCache;

/// Expected token shape for this API.
#[derive(Debug, Clone)]
pub struct AuthenticatorSettings {
    pub issuer: String,
    pub audience: String,
    pub leeway_seconds: u64,
    pub jwks_fetch_timeout: Duration,
}

/// Bearer token verifier backed by the identity provider's JWKS.
///
/// Safe to share between requests (`Arc<Authenticator>`); the only mutable
/// state is the signing key cache.
#[derive(Debug)]
pub struct Authenticator {
    keys: SigningKeyCache,
    issuer: String,
    audience: String,
    leeway_seconds: u64,
}

impl Authenticator {
    pub fn new(settings: AuthenticatorSettings, source: Arc<dyn JwksSource>) -> Self {
        Self {
            keys: SigningKeyCache::new(source, settings.jwks_fetch_timeout),
            issuer: settings.issuer,
            audience: settings.audience,
            leeway_seconds: settings.leeway_seconds,
        }
    }

    pub fn keys(&self) -> &SigningKeyCache {
        &self.keys
    }

    /// Fetch the key set once ahead of the first request. Returns the number of
    /// usable keys.
    pub async fn prefetch_keys(&self) -> Result<usize, UpstreamError> {
        Ok(self.keys.refresh().await?.len())
    }

    /// Verify the value of an `Authorization` header.
    ///
    /// This is the entry point for middleware.
    pub async fn verify_authorization(
        &self,
        header: Option<&str>,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        let token = bearer_token(header)?;
        self.verify(token).await
    }

    /// Verify a raw JWT.
    ///
    /// Order: header (kid) -> key lookup (one refresh on miss) -> signature ->
    /// exp/nbf -> aud/iss -> sub.
    pub async fn verify(&self, raw_token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        if raw_token.trim().is_empty() {
            return Err(AuthError::Malformed(MalformedReason::EmptyToken));
        }

        let header = jsonwebtoken::decode_header(raw_token)
            .map_err(|_| AuthError::Malformed(MalformedReason::UndecodableHeader))?;
        let kid = header
            .kid
            .as_deref()
            .filter(|kid| !kid.is_empty())
            .ok_or(AuthError::Malformed(MalformedReason::MissingKid))?;

        let key = self.keys.resolve(kid).await?;

        // Only the algorithm the key is published for; a token that names a
        // different one is rejected before any signature math.
        let mut validation = Validation::new(key.algorithm);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = self.leeway_seconds;

        let data = jsonwebtoken::decode::<Map<String, Value>>(raw_token, &key.key, &validation)?;

        let subject = data
            .claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|sub| !sub.trim().is_empty())
            .ok_or(AuthError::Malformed(MalformedReason::MissingSubject))?
            .to_string();

        Ok(AuthenticatedIdentity::new(
            subject,
            data.claims,
            raw_token.to_string(),
        ))
    }
}

/// Extract `<token>` from `Bearer <token>`.
///
/// The scheme is case-insensitive and must be followed by exactly one token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::Malformed(MalformedReason::MissingHeader))?;

    let mut parts = header.split_whitespace();
    let scheme = parts
        .next()
        .ok_or(AuthError::Malformed(MalformedReason::MissingHeader))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Malformed(MalformedReason::NotBearer));
    }

    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(token),
        (None, _) => Err(AuthError::Malformed(MalformedReason::EmptyToken)),
        (Some(_), Some(_)) => Err(AuthError::Malformed(MalformedReason::NotBearer)),
    }
}
