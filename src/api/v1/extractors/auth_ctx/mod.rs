/*!
 * Basic 認証済みユーザーの context extractor
 *
 * - middleware::auth::basic が extensions に入れた AuthCtx を handler に渡す
 * - AuthCtx は users 行から password hash を落としたもの。リクエストをまたいで保持しない
 * - 取り出しは core、型は types
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
