/*
 * Responsibility
 * - /courses 系 CRUD handler
 * - 変更系 (PUT/DELETE) は必ず existence → ownership → (validation) → mutation の順
 *   guard_owned() を通った CourseRow が無いと repo の update/delete まで辿り着けない形にしている
 * - JSON body の parse 失敗も guard の後で評価する (存在しない course には常に 404)
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::v1::{
        dto::courses::{CourseResponse, CreateCourseRequest, UpdateCourseRequest},
        extractors::{AuthCtxExtractor, path_id::CourseId},
    },
    error::AppError,
    services::auth::ownership::guard_owned,
    state::AppState,
};

const UPDATE_DENIED: &str = "Can't update course if you aren't the owner";
const DELETE_DENIED: &str = "Can't delete course if you aren't the owner";

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v)
        .map_err(|e| AppError::bad_request([e.body_text()]))
}

pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let rows = state.courses.list_with_owner().await?;
    Ok(Json(rows.into_iter().map(CourseResponse::from).collect()))
}

pub async fn get_course(
    State(state): State<AppState>,
    course_id: CourseId,
) -> Result<Json<CourseResponse>, AppError> {
    let row = state
        .courses
        .get_with_owner(course_id.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(CourseResponse::from(row)))
}

pub async fn create_course(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    body: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let new_course = parse_body(body)?
        .into_new_course()
        .map_err(AppError::bad_request)?;

    let row = state.courses.create(auth.user_id, new_course).await?;
    tracing::info!(course_id = row.id, user_id = auth.user_id, "course created");

    let location = HeaderValue::from_str(&format!("/api/v1/courses/{}", row.id))
        .map_err(|_| AppError::Internal)?;

    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

pub async fn update_course(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    course_id: CourseId,
    body: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let found = state.courses.find(course_id.id).await?;
    let course = guard_owned(auth.user_id, found).map_err(|e| {
        tracing::warn!(course_id = course_id.id, user_id = auth.user_id, ?e, "course update rejected");
        AppError::from_guard(e, UPDATE_DENIED)
    })?;

    let changes = parse_body(body)?
        .into_changes()
        .map_err(AppError::bad_request)?;

    state.courses.update(course.id, changes).await?;
    tracing::info!(course_id = course.id, user_id = auth.user_id, "course updated");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_course(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    course_id: CourseId,
) -> Result<StatusCode, AppError> {
    let found = state.courses.find(course_id.id).await?;
    let course = guard_owned(auth.user_id, found).map_err(|e| {
        tracing::warn!(course_id = course_id.id, user_id = auth.user_id, ?e, "course delete rejected");
        AppError::from_guard(e, DELETE_DENIED)
    })?;

    state.courses.delete(course.id).await?;
    tracing::info!(course_id = course.id, user_id = auth.user_id, "course deleted");

    Ok(StatusCode::NO_CONTENT)
}
