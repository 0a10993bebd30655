//! Basic 認証 → AuthCtx を extensions に入れる
//!
//! - 認証が必要な method にだけ `route_layer` で掛ける
//! - 失敗理由 (no credentials / user not found / secret mismatch) は warn ログにだけ残し、
//!   レスポンスは常に同じ 401 `{"message":"Access Denied"}` にする (ユーザー列挙対策)
//! - 失敗時は next を呼ばないので handler は一切実行されない
//! - 平文パスワードはログに出さない

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AuthOutcome;
use crate::state::AppState;

/// 認証必須の method にだけ Basic 認証を掛ける。
///
/// `MethodRouter::route_layer` なので、405 を返す method fallback には掛からない。
///
/// 例：
/// ```ignore
/// let users = middleware::auth::basic::apply(get(current_user), state.clone()).post(create_user);
/// Router::new().route("/users", users)
/// ```
pub fn apply(method_router: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    method_router.route_layer(middleware::from_fn_with_state(state, authenticate_user))
}

pub async fn authenticate_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // ストレージ障害は認証失敗ではないので 401 にせず、そのまま 500 として伝播させる
    let outcome = state.auth.authenticate(req.headers()).await?;

    let reason = outcome.reason();
    let user = match outcome {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::NoCredentials => {
            tracing::warn!(reason, "authentication failed");
            return Err(AppError::Unauthorized);
        }
        AuthOutcome::UserNotFound { identifier } | AuthOutcome::SecretMismatch { identifier } => {
            tracing::warn!(reason, email = %identifier, "authentication failed");
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(user_id = user.id, "authentication successful");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(user));

    Ok(next.run(req).await)
}
