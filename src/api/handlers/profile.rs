/*
 * Responsibility
 * - POST /api/user/profile/grammar/upload, GET /api/user/profile/grammar (protected)
 * - 投稿者は token の subject。username は nickname → name → sub の順
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::dto::grammar::{GrammarResponse, ProfileGrammarParams, UploadGrammarRequest},
    api::extractors::AuthCtx,
    error::AppError,
    repos::grammar_repo,
    state::AppState,
};

pub async fn upload(
    State(state): State<AppState>,
    auth: AuthCtx,
    Json(req): Json<UploadGrammarRequest>,
) -> Result<(StatusCode, Json<GrammarResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_GRAMMAR", msg))?;

    let row = grammar_repo::create(
        state.db(),
        auth.subject(),
        auth.username(),
        req.title.trim(),
        &req.body,
    )
    .await?;

    tracing::info!(subject = auth.subject(), grammar_id = %row.id, "grammar uploaded");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_by_username(
    State(state): State<AppState>,
    auth: AuthCtx,
    Query(params): Query<ProfileGrammarParams>,
) -> Result<Json<Vec<GrammarResponse>>, AppError> {
    let username = params
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(auth.username());

    let rows = grammar_repo::list_by_username(state.db(), username).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
