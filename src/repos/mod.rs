/*
 * Responsibility
 * - 永続化層の公開インターフェース
 * - handler / middleware は trait (UserStore / CourseStore) だけを見る
 */
pub mod course_repo;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod user_repo;

pub use course_repo::{CourseStore, PgCourseRepo};
pub use user_repo::{PgUserRepo, UserStore};
