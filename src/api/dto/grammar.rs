/*
 * Responsibility
 * - Grammar の request/response DTO
 * - validate() で形式チェック
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::grammar_repo::GrammarRow;

pub const TITLE_MAX_CHARS: usize = 200;
pub const BODY_MAX_CHARS: usize = 10_000;

pub const LIST_LIMIT_DEFAULT: i64 = 10;
pub const LIST_LIMIT_MAX: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct GenerateListParams {
    pub limit: Option<i64>,
}

impl GenerateListParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(LIST_LIMIT_DEFAULT)
            .clamp(1, LIST_LIMIT_MAX)
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileGrammarParams {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadGrammarRequest {
    pub title: String,
    pub body: String,
}

impl UploadGrammarRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err("title must be <= 200 chars");
        }
        if self.body.trim().is_empty() {
            return Err("body is required");
        }
        if self.body.chars().count() > BODY_MAX_CHARS {
            return Err("body must be <= 10000 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct GrammarResponse {
    pub id: Uuid,
    pub username: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<GrammarRow> for GrammarResponse {
    fn from(row: GrammarRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            title: row.title,
            body: row.body,
            created_at: row.created_at,
        }
    }
}
