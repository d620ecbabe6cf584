use std::time::Duration;

use thiserror::Error;

/// Why a credential was rejected before any key was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    MissingHeader,
    NotBearer,
    EmptyToken,
    UndecodableHeader,
    MissingKid,
    UndecodableClaims,
    MissingSubject,
}

impl MalformedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing authorization header",
            Self::NotBearer => "authorization scheme is not bearer",
            Self::EmptyToken => "empty bearer token",
            Self::UndecodableHeader => "token header cannot be decoded",
            Self::MissingKid => "token header has no kid",
            Self::UndecodableClaims => "token claims cannot be decoded",
            Self::MissingSubject => "token has no subject",
        }
    }
}

/// Outcome of a failed bearer verification.
///
/// The variants are distinguishable for logs; the HTTP layer collapses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("malformed credential: {}", .0.as_str())]
    Malformed(MalformedReason),
    #[error("token expired")]
    ExpiredSignature,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("signing key not found")]
    UnknownKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("audience mismatch")]
    AudienceMismatch,
    #[error("issuer mismatch")]
    IssuerMismatch,
}

impl AuthError {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::ExpiredSignature)
    }

    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, Self::Malformed(MalformedReason::MissingHeader))
    }

    /// Stable identifier for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::ExpiredSignature => "expired_signature",
            Self::NotYetValid => "not_yet_valid",
            Self::UnknownKey => "unknown_key",
            Self::InvalidSignature => "invalid_signature",
            Self::AudienceMismatch => "audience_mismatch",
            Self::IssuerMismatch => "issuer_mismatch",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::ExpiredSignature,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidAudience => Self::AudienceMismatch,
            ErrorKind::InvalidIssuer => Self::IssuerMismatch,
            ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
                "aud" => Self::AudienceMismatch,
                "iss" => Self::IssuerMismatch,
                "sub" => Self::Malformed(MalformedReason::MissingSubject),
                _ => Self::Malformed(MalformedReason::UndecodableClaims),
            },
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed(MalformedReason::UndecodableClaims),
            // Bad signature, algorithm confusion, unusable key material.
            _ => Self::InvalidSignature,
        }
    }
}

/// Failure talking to the identity provider's key endpoint.
///
/// Never returned to request handlers; the key cache logs it and the caller
/// sees `AuthError::UnknownKey`.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("jwks request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("jwks request timed out after {0:?}")]
    Timeout(Duration),
}
