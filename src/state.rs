/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users / courses: 永続化層 (trait object で差し替え可能)
 *   - hasher: パスワードハッシュ (コストは Config 由来)
 *   - auth: Basic 認証 (users + hasher を束ねたもの)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::{CourseStore, UserStore};
use crate::services::auth::{Authenticator, HashError, SecretHasher};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub courses: Arc<dyn CourseStore>,
    pub hasher: SecretHasher,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        courses: Arc<dyn CourseStore>,
        hasher: SecretHasher,
    ) -> Result<Self, HashError> {
        let auth = Arc::new(Authenticator::new(users.clone(), hasher.clone())?);
        Ok(Self {
            users,
            courses,
            hasher,
            auth,
        })
    }
}
