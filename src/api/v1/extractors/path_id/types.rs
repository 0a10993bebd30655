/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - 新しいリソースが増えたらここにタグと alias を足す
 */
use super::core::PathId;

// courses
pub enum CourseTag {}
pub type CourseId = PathId<CourseTag>;
