use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{AuthError, AuthenticatedIdentity, MalformedReason};

/// Handler で AuthenticatedIdentity を受け取るための extractor
/// middleware が identity を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す (route が Protected で登録されていない)
#[derive(Debug, Clone)]
pub struct AuthCtx(pub AuthenticatedIdentity);

impl Deref for AuthCtx {
    type Target = AuthenticatedIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthCtx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(AuthCtx)
            .ok_or_else(|| {
                tracing::error!("AuthCtx requested on a route without the bearer gate");
                AppError::Unauthorized(AuthError::Malformed(MalformedReason::MissingHeader))
            })
    }
}
