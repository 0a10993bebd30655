/*
 * Responsibility
 * - /users 系 handler
 * - GET: 認証済みユーザー自身を返す (middleware が引いた AuthCtx をそのまま使う。再検索しない)
 * - POST: 登録。平文パスワードはここで hash して捨て、repo には hash だけ渡す
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{
    api::v1::{
        dto::users::{CreateUserRequest, UserResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::user_repo::NewUser,
    state::AppState,
};

pub async fn current_user(AuthCtxExtractor(auth): AuthCtxExtractor) -> Json<UserResponse> {
    Json(UserResponse::from(auth))
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body.map_err(|e| AppError::bad_request([e.body_text()]))?;
    req.validate().map_err(AppError::bad_request)?;

    let (Some(first_name), Some(last_name), Some(email_address), Some(password)) = (
        req.first_name,
        req.last_name,
        req.email_address,
        req.password,
    ) else {
        // validate() 済みなのでここには来ない
        return Err(AppError::Internal);
    };

    let password_hash = state.hasher.hash_blocking(password).await.map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        AppError::Internal
    })?;

    let row = state
        .users
        .create(NewUser {
            first_name,
            last_name,
            email_address,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = row.id, "user created");

    Ok((StatusCode::CREATED, [(header::LOCATION, "/")]))
}
