/*
 * Responsibility
 * - GET /api/grammar/generate, /api/grammar/generateList (protected)
 * - 登録済み grammar からランダムに返す
 */
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    api::dto::grammar::{GenerateListParams, GrammarResponse},
    api::extractors::AuthCtx,
    error::AppError,
    repos::grammar_repo,
    state::AppState,
};

pub async fn generate(
    State(state): State<AppState>,
    auth: AuthCtx,
) -> Result<Json<GrammarResponse>, AppError> {
    let row = grammar_repo::random_one(state.db())
        .await?
        .ok_or(AppError::not_found("grammar"))?;

    tracing::debug!(subject = auth.subject(), grammar_id = %row.id, "grammar generated");

    Ok(Json(row.into()))
}

pub async fn generate_list(
    State(state): State<AppState>,
    auth: AuthCtx,
    Query(params): Query<GenerateListParams>,
) -> Result<Json<Vec<GrammarResponse>>, AppError> {
    let rows = grammar_repo::random_sample(state.db(), params.limit()).await?;

    tracing::debug!(subject = auth.subject(), count = rows.len(), "grammar list generated");

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
