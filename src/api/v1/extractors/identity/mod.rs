/*!
 * Authenticated identity extractor
 *
 * Responsibility:
 * - 認証済みリクエストの AuthenticatedIdentity を handler に提供する
 * - 型定義 (AuthenticatedIdentity) は services::auth 側、axum 依存はここに閉じ込める
 */

mod core;

pub use core::Identity;
