/*
 * Responsibility
 * - Courses の request/response DTO
 * - 所有者 (userId) は request からは受け取らない。作成時は認証済みユーザー、更新では変更不可
 */
use serde::{Deserialize, Deserializer, Serialize};

use crate::repos::course_repo::{CourseChanges, CourseWithOwnerRow, NewCourse};

const TITLE_REQUIRED: &str = "A course title is required";
const TITLE_EMPTY: &str = "Please provide a title for the course";
const DESCRIPTION_REQUIRED: &str = "A course description is required.";
const DESCRIPTION_EMPTY: &str = "Please provide a course description.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl CreateCourseRequest {
    /// Validate and convert into the storage shape.
    pub fn into_new_course(self) -> Result<NewCourse, Vec<&'static str>> {
        let mut errors = Vec::new();

        let title = required(self.title, TITLE_REQUIRED, TITLE_EMPTY, &mut errors);
        let description = required(
            self.description,
            DESCRIPTION_REQUIRED,
            DESCRIPTION_EMPTY,
            &mut errors,
        );

        match (title, description) {
            (Some(title), Some(description)) if errors.is_empty() => Ok(NewCourse {
                title,
                description,
                estimated_time: self.estimated_time,
                materials_needed: self.materials_needed,
            }),
            _ => Err(errors),
        }
    }
}

fn required(
    value: Option<String>,
    missing: &'static str,
    empty: &'static str,
    errors: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        None => {
            errors.push(missing);
            None
        }
        Some(v) if v.trim().is_empty() => {
            errors.push(empty);
            None
        }
        Some(v) => Some(v),
    }
}

/// Partial update: absent fields stay as they are.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (rejected for title / description, set NULL otherwise)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub estimated_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub materials_needed: Option<Option<String>>,
}

// serde は `null` を欠落と同じ None にしてしまうので、キーがあれば Some で包む
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateCourseRequest {
    pub fn into_changes(self) -> Result<CourseChanges, Vec<&'static str>> {
        let mut errors = Vec::new();

        let title = self
            .title
            .and_then(|v| required(v, TITLE_REQUIRED, TITLE_EMPTY, &mut errors));
        let description = self.description.and_then(|v| {
            required(v, DESCRIPTION_REQUIRED, DESCRIPTION_EMPTY, &mut errors)
        });
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CourseChanges {
            title,
            description,
            estimated_time: self.estimated_time,
            materials_needed: self.materials_needed,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i64,
    #[serde(rename = "User")]
    pub user: OwnerResponse,
}

impl From<CourseWithOwnerRow> for CourseResponse {
    fn from(row: CourseWithOwnerRow) -> Self {
        let course = row.course;
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            estimated_time: course.estimated_time,
            materials_needed: course.materials_needed,
            user_id: course.user_id,
            user: OwnerResponse {
                id: course.user_id,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                email_address: row.owner_email_address,
            },
        }
    }
}
