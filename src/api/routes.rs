/*
 * Responsibility
 * - /api の URL 構造を定義 (method + path + public/protected)
 * - 重複登録は起動時に RouteError として検出する
 */
use axum::http::Method;

use crate::api::handlers::{grammar, health, login, profile};
use crate::api::route_table::{Access, RouteError, RouteTable};

pub fn api_routes() -> Result<RouteTable, RouteError> {
    let mut table = RouteTable::new();

    table
        .register(Method::POST, "/api/login", login::login, Access::Public)?
        .register(Method::GET, "/api/health", health::health, Access::Public)?;

    // Secured routes
    table
        .register(
            Method::GET,
            "/api/grammar/generate",
            grammar::generate,
            Access::Protected,
        )?
        .register(
            Method::GET,
            "/api/grammar/generateList",
            grammar::generate_list,
            Access::Protected,
        )?
        .register(
            Method::POST,
            "/api/user/profile/grammar/upload",
            profile::upload,
            Access::Protected,
        )?
        .register(
            Method::GET,
            "/api/user/profile/grammar",
            profile::list_by_username,
            Access::Protected,
        )?;

    Ok(table)
}
