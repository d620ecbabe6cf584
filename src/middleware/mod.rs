/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: protected route の bearer 検証
 * - cors: OPTIONS preflight (routing より前)
 * - http: request id / trace / body limit / timeout
 */
pub mod auth;
pub mod cors;
pub mod http;
