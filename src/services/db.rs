/*
 * Responsibility
 * - PostgreSQL 接続プール (PgPool) の生成
 * - 起動時に 1 回だけ呼ばれる。接続できなければ起動失敗
 */
use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connect eagerly so a bad `DATABASE_URL` fails startup instead of the first request.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;

    tracing::info!(max_connections, "database pool ready");

    Ok(pool)
}
