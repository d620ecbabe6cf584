/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストの identity を handler に提供する
 * - 検証そのものは middleware::auth の責務。ここは受け渡しだけ
 *
 * Public API:
 * - AuthCtx
 */

mod core;

pub use core::AuthCtx;
