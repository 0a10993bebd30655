/*
 * Responsibility
 * - Path の String を受け、内部 ID (i64) へ変換する
 * - 数値として解釈できない id は「そのリソースは存在しない」として 404 にする
 *   (400 にすると、存在確認より前に別の失敗クラスが見えてしまう)
 * 置くもの
 *  - PathId<T> の定義（ジェネリック本体）
 *  - impl FromRequestParts<AppState> for PathId<T>
 * 置かないもの
 *  - Course などの具体リソース名 (types.rs 側)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

pub struct PathId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> PathId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

impl<T> FromRequestParts<AppState> for PathId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        let id = parse_id(&raw).ok_or(AppError::NotFound)?;
        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for PathId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathId").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn only_positive_integers_are_ids() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}
