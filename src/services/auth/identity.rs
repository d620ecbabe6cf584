use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Verified caller identity, attached to request extensions by the auth
/// middleware and dropped with the request.
#[derive(Clone)]
pub struct AuthenticatedIdentity {
    subject: String,
    claims: Map<String, Value>,
    raw_token: String,
}

impl AuthenticatedIdentity {
    pub(crate) fn new(subject: String, claims: Map<String, Value>, raw_token: String) -> Self {
        Self {
            subject,
            claims,
            raw_token,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    /// The bearer token as presented. Handlers that forward the credential to
    /// another service need it; nothing else should.
    pub fn raw_token(&self) -> &str {
        &self.raw_token
    }

    /// Display name for profile features: `nickname`, then `name`, then `sub`.
    pub fn username(&self) -> &str {
        ["nickname", "name"]
            .iter()
            .filter_map(|claim| self.claim_str(claim))
            .find(|v| !v.trim().is_empty())
            .unwrap_or(&self.subject)
    }
}

impl fmt::Debug for AuthenticatedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the token
        f.debug_struct("AuthenticatedIdentity")
            .field("subject", &self.subject)
            .field("claims", &self.claims.keys().collect::<Vec<_>>())
            .field("token", &token_fingerprint(&self.raw_token))
            .finish()
    }
}

/// Short, non-reversible tag for correlating a token across log lines.
pub fn token_fingerprint(raw_token: &str) -> String {
    let digest = Sha256::digest(raw_token.as_bytes());
    let mut encoded = URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(12);
    encoded
}
