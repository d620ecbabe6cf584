/*
 * Responsibility
 * - grammars テーブル向け SQLx 操作
 * - PgPool を受け取り、生成 (ランダム取得) / 投稿 / ユーザー別一覧を提供
 *
 * Table:
 *   CREATE TABLE grammars (
 *       id         UUID PRIMARY KEY,
 *       owner_sub  TEXT NOT NULL,
 *       username   TEXT NOT NULL,
 *       title      TEXT NOT NULL,
 *       body       TEXT NOT NULL,
 *       created_at TIMESTAMPTZ NOT NULL DEFAULT now()
 *   );
 *   CREATE INDEX grammars_username_idx ON grammars (username, created_at DESC);
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct GrammarRow {
    pub id: Uuid,
    pub owner_sub: String,
    pub username: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

pub async fn random_one(db: &PgPool) -> Result<Option<GrammarRow>, RepoError> {
    let row = sqlx::query_as::<_, GrammarRow>(
        r#"
        SELECT id, owner_sub, username, title, body, created_at
        FROM grammars
        ORDER BY random()
        LIMIT 1
        "#,
    )
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn random_sample(db: &PgPool, limit: i64) -> Result<Vec<GrammarRow>, RepoError> {
    let rows = sqlx::query_as::<_, GrammarRow>(
        r#"
        SELECT id, owner_sub, username, title, body, created_at
        FROM grammars
        ORDER BY random()
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    owner_sub: &str,
    username: &str,
    title: &str,
    body: &str,
) -> Result<GrammarRow, RepoError> {
    let row = sqlx::query_as::<_, GrammarRow>(
        r#"
        INSERT INTO grammars (id, owner_sub, username, title, body)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner_sub, username, title, body, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_sub)
    .bind(username)
    .bind(title)
    .bind(body)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn list_by_username(db: &PgPool, username: &str) -> Result<Vec<GrammarRow>, RepoError> {
    let rows = sqlx::query_as::<_, GrammarRow>(
        r#"
        SELECT id, owner_sub, username, title, body, created_at
        FROM grammars
        WHERE username = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(username)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
