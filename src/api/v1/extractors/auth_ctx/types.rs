/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - リクエストごとに作られて捨てられる。永続化もリクエスト間の共有もしない
 * - パスワードハッシュは持たない (UserRow から落としてから入れる)
 */
use crate::repos::user_repo::UserRow;

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<UserRow> for AuthCtx {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email_address: row.email_address,
        }
    }
}
