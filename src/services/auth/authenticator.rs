//! Basic credential → stored user の照合
//!
//! 1 リクエストにつき 1 回だけ評価する。結果はキャッシュしない (セッションなし)。
//!
//! ```text
//! extract ──Absent/Malformed──▶ NoCredentials
//!    │
//!    ▼
//! find_by_email ──None──▶ (verify against a dummy hash) ──▶ UserNotFound
//!    │
//!    ▼
//! verify ──false / malformed hash──▶ SecretMismatch
//!    │
//!    ▼
//! Authenticated(user)
//! ```

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::repos::{UserStore, error::RepoError, user_repo::UserRow};
use crate::services::auth::{
    credentials::{self, Extracted},
    hasher::{HashError, SecretHasher},
};

// 未登録 email でも verify を 1 回走らせるための hash 元。値自体に意味はない
const DUMMY_SECRET: &str = "course-api dummy secret";

#[derive(Debug)]
pub enum AuthOutcome {
    NoCredentials,
    UserNotFound { identifier: String },
    SecretMismatch { identifier: String },
    Authenticated(UserRow),
}

impl AuthOutcome {
    /// Internal reason, for logs only.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthOutcome::NoCredentials => "no credentials",
            AuthOutcome::UserNotFound { .. } => "user not found",
            AuthOutcome::SecretMismatch { .. } => "secret mismatch",
            AuthOutcome::Authenticated(_) => "authenticated",
        }
    }
}

#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    hasher: SecretHasher,
    dummy_hash: String,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Fails only if the dummy hash cannot be computed with `hasher`.
    pub fn new(users: Arc<dyn UserStore>, hasher: SecretHasher) -> Result<Self, HashError> {
        let dummy_hash = hasher.hash(DUMMY_SECRET)?;
        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }

    /// Only storage failures come back as `Err`; every credential problem is
    /// an [`AuthOutcome`].
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthOutcome, RepoError> {
        let creds = match credentials::extract(headers) {
            Extracted::Credentials(creds) => creds,
            Extracted::Absent => return Ok(AuthOutcome::NoCredentials),
            Extracted::Malformed(why) => {
                tracing::debug!(why, "malformed authorization header");
                return Ok(AuthOutcome::NoCredentials);
            }
        };

        let Some(user) = self.users.find_by_email(&creds.identifier).await? else {
            // 同じコストの verify を払わせ、応答時間から登録有無が分からないようにする
            let _ = self
                .hasher
                .verify_blocking(creds.secret, self.dummy_hash.clone())
                .await;
            return Ok(AuthOutcome::UserNotFound {
                identifier: creds.identifier,
            });
        };

        let verified = self
            .hasher
            .verify_blocking(creds.secret, user.password_hash.clone())
            .await
            .unwrap_or_else(|err| {
                tracing::error!(error = %err, user_id = user.id, "stored password hash unusable");
                false
            });

        if verified {
            Ok(AuthOutcome::Authenticated(user))
        } else {
            Ok(AuthOutcome::SecretMismatch {
                identifier: creds.identifier,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header};

    use super::*;
    use crate::repos::{memory::MemoryStore, user_repo::NewUser};
    use crate::services::auth::{credentials::basic_header, hasher::test_hasher};

    async fn setup() -> (Arc<MemoryStore>, Authenticator) {
        let store = Arc::new(MemoryStore::new());
        let hasher = test_hasher();
        UserStore::create(
            store.as_ref(),
            NewUser {
                first_name: "Joe".into(),
                last_name: "Smith".into(),
                email_address: "joe@smith.com".into(),
                password_hash: hasher.hash("joepassword").unwrap(),
            },
        )
        .await
        .unwrap();
        let auth = Authenticator::new(store.clone(), hasher).unwrap();
        (store, auth)
    }

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[tokio::test]
    async fn missing_header_never_touches_the_store() {
        let (store, auth) = setup().await;
        let outcome = auth.authenticate(&HeaderMap::new()).await.unwrap();
        assert!(matches!(outcome, AuthOutcome::NoCredentials));
        assert_eq!(store.email_lookups(), 0);
    }

    #[tokio::test]
    async fn malformed_header_is_no_credentials() {
        let (store, auth) = setup().await;
        let outcome = auth.authenticate(&headers("Bearer xyz")).await.unwrap();
        assert!(matches!(outcome, AuthOutcome::NoCredentials));
        assert_eq!(store.email_lookups(), 0);
    }

    #[tokio::test]
    async fn unknown_email() {
        let (_, auth) = setup().await;
        let outcome = auth
            .authenticate(&headers(&basic_header("nobody@smith.com", "joepassword")))
            .await
            .unwrap();
        assert!(matches!(outcome, AuthOutcome::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_email_costs_one_verification_like_a_wrong_secret() {
        let store = Arc::new(MemoryStore::new());
        let hasher = test_hasher();
        UserStore::create(
            store.as_ref(),
            NewUser {
                first_name: "Joe".into(),
                last_name: "Smith".into(),
                email_address: "joe@smith.com".into(),
                password_hash: hasher.hash("joepassword").unwrap(),
            },
        )
        .await
        .unwrap();
        let auth = Authenticator::new(store, hasher.clone()).unwrap();
        let before = hasher.verifications();

        let outcome = auth
            .authenticate(&headers(&basic_header("nobody@smith.com", "joepassword")))
            .await
            .unwrap();
        assert!(matches!(outcome, AuthOutcome::UserNotFound { .. }));
        assert_eq!(hasher.verifications(), before + 1);

        let outcome = auth
            .authenticate(&headers(&basic_header("joe@smith.com", "wrong")))
            .await
            .unwrap();
        assert!(matches!(outcome, AuthOutcome::SecretMismatch { .. }));
        assert_eq!(hasher.verifications(), before + 2);
    }

    #[tokio::test]
    async fn wrong_secret() {
        let (_, auth) = setup().await;
        let outcome = auth
            .authenticate(&headers(&basic_header("joe@smith.com", "wrong")))
            .await
            .unwrap();
        assert!(matches!(outcome, AuthOutcome::SecretMismatch { .. }));
    }

    #[tokio::test]
    async fn correct_credentials() {
        let (_, auth) = setup().await;
        let outcome = auth
            .authenticate(&headers(&basic_header("joe@smith.com", "joepassword")))
            .await
            .unwrap();
        match outcome {
            AuthOutcome::Authenticated(user) => assert_eq!(user.email_address, "joe@smith.com"),
            other => panic!("expected Authenticated, got {}", other.reason()),
        }
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_a_mismatch() {
        let store = Arc::new(MemoryStore::new());
        UserStore::create(
            store.as_ref(),
            NewUser {
                first_name: "Sally".into(),
                last_name: "Jones".into(),
                email_address: "sally@jones.com".into(),
                password_hash: "not-a-hash".into(),
            },
        )
        .await
        .unwrap();
        let auth = Authenticator::new(store, test_hasher()).unwrap();

        let outcome = auth
            .authenticate(&headers(&basic_header("sally@jones.com", "not-a-hash")))
            .await
            .unwrap();
        assert!(matches!(outcome, AuthOutcome::SecretMismatch { .. }));
    }
}
