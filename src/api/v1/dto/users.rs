/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() で形式チェック (メッセージは全件集めて 400 で返す)
 * - password は request にしか現れない。response 型には持たせない
 */
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::api::v1::extractors::AuthCtx;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .finish_non_exhaustive()
    }
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let mut errors = Vec::new();

        match self.first_name.as_deref() {
            None => errors.push("A first name is required"),
            Some(v) if v.trim().is_empty() => errors.push("Please provide a first name"),
            Some(_) => {}
        }
        match self.last_name.as_deref() {
            None => errors.push("A last name is required"),
            Some(v) if v.trim().is_empty() => errors.push("Please provide a last name"),
            Some(_) => {}
        }
        match self.email_address.as_ref() {
            None => errors.push("An email is required"),
            Some(v) if !v.validate_email() || !has_tld(v) => {
                errors.push("Please provide a valid email address")
            }
            Some(_) => {}
        }
        match self.password.as_deref() {
            None => errors.push("A password is required"),
            Some("") => errors.push("Please provide a password"),
            Some(_) => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// validator は `joe@smith` や `joe@smith.c` も通すので、2 文字以上の英字 TLD (または IDN の xn--) を別途要求する
fn has_tld(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    tld.starts_with("xn--") || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<AuthCtx> for UserResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            id: ctx.user_id,
            first_name: ctx.first_name,
            last_name: ctx.last_name,
            email_address: ctx.email_address,
        }
    }
}
