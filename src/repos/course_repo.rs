/*
 * Responsibility
 * - courses CRUD
 * - "userId" の FK (CASCADE) 前提で削除挙動を意識
 * - 所有者チェックはここではしない (handler 側で existence → ownership の順に判定済み)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;
use crate::services::auth::ownership::Owned;

#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    #[sqlx(rename = "courseId")]
    pub id: i64,
    pub title: String,
    pub description: String,
    #[sqlx(rename = "estimatedTime")]
    pub estimated_time: Option<String>,
    #[sqlx(rename = "materialsNeeded")]
    pub materials_needed: Option<String>,
    #[sqlx(rename = "userId")]
    pub user_id: i64,
}

impl Owned for CourseRow {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// A course joined with the public fields of its owner.
#[derive(Debug, Clone, FromRow)]
pub struct CourseWithOwnerRow {
    #[sqlx(flatten)]
    pub course: CourseRow,
    #[sqlx(rename = "ownerFirstName")]
    pub owner_first_name: String,
    #[sqlx(rename = "ownerLastName")]
    pub owner_last_name: String,
    #[sqlx(rename = "ownerEmailAddress")]
    pub owner_email_address: String,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

/// Partial update. `None` leaves the column untouched.
///
/// The nullable columns are tri-state:
/// - None: do not update
/// - Some(None): set NULL
/// - Some(Some(v)): set v
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<Option<String>>,
    pub materials_needed: Option<Option<String>>,
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_with_owner(&self) -> RepoResult<Vec<CourseWithOwnerRow>>;

    async fn get_with_owner(&self, course_id: i64) -> RepoResult<Option<CourseWithOwnerRow>>;

    async fn find(&self, course_id: i64) -> RepoResult<Option<CourseRow>>;

    async fn create(&self, owner_id: i64, course: NewCourse) -> RepoResult<CourseRow>;

    async fn update(&self, course_id: i64, changes: CourseChanges) -> RepoResult<()>;

    async fn delete(&self, course_id: i64) -> RepoResult<()>;
}

#[derive(Clone, Debug)]
pub struct PgCourseRepo {
    pool: PgPool,
}

impl PgCourseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_WITH_OWNER: &str = r#"
    SELECT
        c."courseId", c.title, c.description, c."estimatedTime", c."materialsNeeded", c."userId",
        u."firstName" AS "ownerFirstName",
        u."lastName" AS "ownerLastName",
        u."emailAddress" AS "ownerEmailAddress"
    FROM courses c
    JOIN users u ON u."userId" = c."userId"
"#;

#[async_trait]
impl CourseStore for PgCourseRepo {
    async fn list_with_owner(&self) -> RepoResult<Vec<CourseWithOwnerRow>> {
        let sql = format!(r#"{SELECT_WITH_OWNER} ORDER BY c."courseId""#);
        let rows = sqlx::query_as::<_, CourseWithOwnerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn get_with_owner(&self, course_id: i64) -> RepoResult<Option<CourseWithOwnerRow>> {
        let sql = format!(r#"{SELECT_WITH_OWNER} WHERE c."courseId" = $1"#);
        let row = sqlx::query_as::<_, CourseWithOwnerRow>(&sql)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find(&self, course_id: i64) -> RepoResult<Option<CourseRow>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT "courseId", title, description, "estimatedTime", "materialsNeeded", "userId"
            FROM courses
            WHERE "courseId" = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, owner_id: i64, course: NewCourse) -> RepoResult<CourseRow> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            INSERT INTO courses (title, description, "estimatedTime", "materialsNeeded", "userId")
            VALUES ($1, $2, $3, $4, $5)
            RETURNING "courseId", title, description, "estimatedTime", "materialsNeeded", "userId"
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.estimated_time.as_deref())
        .bind(course.materials_needed.as_deref())
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, course_id: i64, changes: CourseChanges) -> RepoResult<()> {
        // "userId" は更新対象に含めない (所有者の移譲は存在しない)
        sqlx::query(
            r#"
            UPDATE courses
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                "estimatedTime" = CASE
                    WHEN $4 = false THEN "estimatedTime"
                    ELSE $5
                END,
                "materialsNeeded" = CASE
                    WHEN $6 = false THEN "materialsNeeded"
                    ELSE $7
                END,
                "updatedAt" = now()
            WHERE "courseId" = $1
            "#,
        )
        .bind(course_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.estimated_time.is_some())
        .bind(changes.estimated_time.flatten())
        .bind(changes.materials_needed.is_some())
        .bind(changes.materials_needed.flatten())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, course_id: i64) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM courses
            WHERE "courseId" = $1
            "#,
        )
        .bind(course_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
