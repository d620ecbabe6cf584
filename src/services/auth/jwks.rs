//! Identity provider key discovery.
//!
//! - `JwksSource`: where key sets come from (HTTP in production, fixed sets in tests)
//! - `SigningKeySet`: an immutable, decoded snapshot of one fetched JWKS
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey,
    jwk::{AlgorithmParameters, EllipticCurve, Jwk, JwkSet, KeyAlgorithm, PublicKeyUse},
};
use url::Url;

use crate::services::auth::error::UpstreamError;

/// Provider of the identity provider's current key set.
///
/// Implementations must be cheap to share (`Arc<dyn JwksSource>`).
#[async_trait]
pub trait JwksSource: Send + Sync + 'static {
    // Where the keys come from (for logging).
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<JwkSet, UpstreamError>;
}

/// `GET <jwks_url>` with a bounded client.
#[derive(Clone, Debug)]
pub struct HttpJwksSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpJwksSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl JwksSource for HttpJwksSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<JwkSet, UpstreamError> {
        let set = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        Ok(set)
    }
}

/// A decoded verification key and the only algorithm it may verify.
#[derive(Clone)]
pub struct VerificationKey {
    pub key: DecodingKey,
    pub algorithm: Algorithm,
}

/// Snapshot of the provider's keys. Never mutated; a refresh builds a new one.
#[derive(Clone, Default)]
pub struct SigningKeySet {
    keys: HashMap<String, VerificationKey>,
    fetched_at: Option<DateTime<Utc>>,
    generation: u64,
}

impl SigningKeySet {
    /// Decodes every usable signing key in `jwks`. Keys without `kid`,
    /// encryption keys, symmetric keys and unsupported algorithms are skipped.
    pub fn from_jwks(jwks: &JwkSet, generation: u64) -> Self {
        let mut keys = HashMap::with_capacity(jwks.keys.len());

        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.as_deref() else {
                tracing::debug!("skipping jwk without kid");
                continue;
            };
            if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
                continue;
            }
            let Some(algorithm) = signing_algorithm(jwk) else {
                tracing::debug!(kid, "skipping jwk with unsupported algorithm");
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid.to_string(), VerificationKey { key, algorithm });
                }
                Err(err) => tracing::warn!(kid, error = %err, "skipping undecodable jwk"),
            }
        }

        Self {
            keys,
            fetched_at: Some(Utc::now()),
            generation,
        }
    }

    pub fn get(&self, kid: &str) -> Option<&VerificationKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Bumped on every successful refresh; 0 means never fetched.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for SigningKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        let mut kids: Vec<&String> = self.keys.keys().collect();
        kids.sort();
        f.debug_struct("SigningKeySet")
            .field("kids", &kids)
            .field("fetched_at", &self.fetched_at)
            .field("generation", &self.generation)
            .finish()
    }
}

fn signing_algorithm(jwk: &Jwk) -> Option<Algorithm> {
    if let Some(alg) = &jwk.common.key_algorithm {
        return match alg {
            KeyAlgorithm::RS256 => Some(Algorithm::RS256),
            KeyAlgorithm::RS384 => Some(Algorithm::RS384),
            KeyAlgorithm::RS512 => Some(Algorithm::RS512),
            KeyAlgorithm::PS256 => Some(Algorithm::PS256),
            KeyAlgorithm::PS384 => Some(Algorithm::PS384),
            KeyAlgorithm::PS512 => Some(Algorithm::PS512),
            KeyAlgorithm::ES256 => Some(Algorithm::ES256),
            KeyAlgorithm::ES384 => Some(Algorithm::ES384),
            KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
            // HMAC and key-wrapping algorithms never verify provider tokens
            _ => None,
        };
    }

    match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => Some(Algorithm::RS256),
        AlgorithmParameters::EllipticCurve(ec) => match ec.curve {
            EllipticCurve::P256 => Some(Algorithm::ES256),
            EllipticCurve::P384 => Some(Algorithm::ES384),
            _ => None,
        },
        AlgorithmParameters::OctetKeyPair(_) => Some(Algorithm::EdDSA),
        // symmetric (`oct`) keys
        _ => None,
    }
}
