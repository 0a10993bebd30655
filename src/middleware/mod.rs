/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 各モジュールは `apply(router, ...)` で Router に掛ける形に揃える
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
