//! access token (JWT) 検証 → AuthenticatedIdentity を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を取り出し、Authenticator で検証する
//! - 失敗時は 401 を返し、内側の handler は呼ばない
//! - 成功時は identity を request extensions に載せて handler を 1 回だけ呼ぶ
//!   (identity は request と一緒に破棄される)

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::token_fingerprint;
use crate::state::AppState;

/// Put bearer verification in front of a single route.
///
/// ```ignore
/// let route = middleware::auth::access::protect(get(handler), state.clone());
/// ```
pub fn protect(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    // route_layer: only runs when the method matched, so unmatched requests
    // still fall through to the 404 fallback without authentication.
    route.route_layer(middleware::from_fn_with_state(state, require_bearer))
}

pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let identity = match state
        .auth()
        .verify_authorization(authorization.as_deref())
        .await
    {
        Ok(identity) => identity,
        Err(err) => {
            let token = authorization
                .as_deref()
                .and_then(|h| h.split_whitespace().nth(1));
            tracing::warn!(
                kind = err.code(),
                error = %err,
                path = %req.uri().path(),
                token = token.map(token_fingerprint).as_deref().unwrap_or("-"),
                "access token verification failed"
            );
            return Err(AppError::Unauthorized(err));
        }
    };

    tracing::debug!(subject = identity.subject(), "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
