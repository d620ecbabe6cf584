/*
 * Responsibility
 * - /api 配下の公開ポイント (api_routes() の re-export など)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod route_table;
mod routes;

pub use route_table::{Access, RouteError, RouteTable};
pub use routes::api_routes;
