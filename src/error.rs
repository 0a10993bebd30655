/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / GuardError を統一的に変換
 *
 * Notes
 * - 認証失敗の内訳 (ヘッダ無し / ユーザー無し / パスワード不一致) はここまで上げない。
 *   middleware でログにだけ残し、外には Unauthorized 一種類として出す
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::ownership::GuardError;

pub const ACCESS_DENIED: &str = "Access Denied";
pub const DUPLICATE_EMAIL: &str = "The email you entered already exists";

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorsBody {
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {}", .errors.join(", "))]
    BadRequest { errors: Vec<String> },
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {message}")]
    Forbidden { message: &'static str },
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::BadRequest {
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::Forbidden { message }
    }

    /// Map the result of `guard_owned` for a route, using `denied` as the
    /// 403 message.
    pub fn from_guard(e: GuardError, denied: &'static str) -> Self {
        match e {
            GuardError::NotFound => AppError::NotFound,
            GuardError::Denied => AppError::forbidden(denied),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest { errors } => {
                (StatusCode::BAD_REQUEST, Json(ErrorsBody { errors })).into_response()
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(MessageBody {
                    message: ACCESS_DENIED.into(),
                }),
            )
                .into_response(),
            AppError::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                Json(MessageBody {
                    message: message.into(),
                }),
            )
                .into_response(),
            AppError::NotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody {
                    message: "internal server error".into(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::bad_request([DUPLICATE_EMAIL]),
            RepoError::Db(err) => {
                tracing::error!(error = ?err, "database error");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_body_is_generic() {
        let res = AppError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "message": "Access Denied" })
        );
    }

    #[tokio::test]
    async fn bad_request_lists_messages() {
        let res = AppError::bad_request(["a", "b"]).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "errors": ["a", "b"] })
        );
    }

    #[test]
    fn conflict_becomes_duplicate_email() {
        match AppError::from(RepoError::Conflict) {
            AppError::BadRequest { errors } => assert_eq!(errors, vec![DUPLICATE_EMAIL]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn guard_errors_keep_distinct_statuses() {
        let not_found = AppError::from_guard(GuardError::NotFound, "nope").into_response();
        let denied = AppError::from_guard(GuardError::Denied, "nope").into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    }
}
