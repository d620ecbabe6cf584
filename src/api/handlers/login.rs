/*
 * Responsibility
 * - POST /api/login (public)
 * - identity provider の authorize URL を組み立てて返す
 *   (token の発行・refresh はこの API の責務ではない)
 */
use axum::{
    Json,
    extract::{Query, State},
};
use url::Url;

use crate::{
    api::dto::login::{LoginParams, LoginResponse},
    error::AppError,
    state::{AppState, LoginSettings},
};

pub const LOGIN_SCOPE: &str = "openid profile email";

pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> Result<Json<LoginResponse>, AppError> {
    let url = authorize_url(&state.login, params.redirect_uri.as_deref())?;

    Ok(Json(LoginResponse {
        authorize_url: url.into(),
    }))
}

pub fn authorize_url(settings: &LoginSettings, redirect_uri: Option<&str>) -> Result<Url, AppError> {
    let Some(client_id) = settings.client_id.as_deref() else {
        tracing::error!("login requested but AUTH_CLIENT_ID is not configured");
        return Err(AppError::Internal);
    };

    let mut url = Url::parse(&format!("https://{}/authorize", settings.domain)).map_err(|e| {
        tracing::error!(error = %e, domain = %settings.domain, "invalid identity provider domain");
        AppError::Internal
    })?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("response_type", "code")
            .append_pair("client_id", client_id)
            .append_pair("audience", &settings.audience)
            .append_pair("scope", LOGIN_SCOPE);

        if let Some(redirect_uri) = redirect_uri.or(settings.redirect_uri.as_deref()) {
            query.append_pair("redirect_uri", redirect_uri);
        }
    }

    Ok(url)
}
