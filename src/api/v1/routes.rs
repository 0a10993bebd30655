/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 同じ path でも method ごとに public / protected が分かれる (GET /courses は public, POST は protected)
 *   Basic 認証は protected な method にだけ掛ける。未対応 method の 405 は認証の有無に関係なく返る
 */
use axum::{
    Router,
    routing::{MethodRouter, get, post, put},
};

use crate::api::v1::handlers::{
    courses::{create_course, delete_course, get_course, list_courses, update_course},
    health::health,
    users::{create_user, current_user},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protect = |method_router: MethodRouter<AppState>| {
        middleware::auth::basic::apply(method_router, state.clone())
    };

    Router::new()
        .route("/health", get(health))
        .route("/users", protect(get(current_user)).post(create_user))
        .route("/courses", protect(post(create_course)).get(list_courses))
        .route(
            "/courses/{id}",
            protect(put(update_course).delete(delete_course)).get(get_course),
        )
}
