// handlers/courses.rs - /api/courses and /api/courses/:id
//
// Reads are public. Create, update and delete require a principal but
// perform no ownership check.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::models::{CourseDetail, CourseInput, CourseListing};
use crate::database::{Store, StoreError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Principal};

pub const COURSE_NOT_FOUND: &str = "Course not found";

/// Non-numeric ids cannot name a course, so they are treated as unresolved
fn parse_course_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found(COURSE_NOT_FOUND))
}

fn course_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => ApiError::not_found(COURSE_NOT_FOUND),
        other => other.into(),
    }
}

fn parse_body(payload: Result<Json<CourseInput>, JsonRejection>) -> Result<CourseInput, ApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

/// GET /api/courses - every course with its owner summary
pub async fn courses_list(State(store): State<Store>) -> ApiResult<Vec<CourseListing>> {
    Ok(ApiResponse::success(store.courses.list().await?))
}

/// GET /api/courses/:id - one course with its full public owner
pub async fn course_get(Path(id): Path<String>, State(store): State<Store>) -> ApiResult<CourseDetail> {
    let id = parse_course_id(&id)?;

    let course = store
        .courses
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(COURSE_NOT_FOUND))?;

    Ok(ApiResponse::success(course))
}

/// POST /api/courses - `{ title, description, userId }`, 201 with `Location: courses/:id`
pub async fn course_post(
    principal: Principal,
    State(store): State<Store>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> ApiResult<()> {
    let input = parse_body(payload)?;

    let course = store.courses.create(input).await.map_err(course_error)?;
    tracing::info!("User {} created course {}", principal.id, course.id);

    Ok(ApiResponse::created(format!("courses/{}", course.id)))
}

/// PUT /api/courses/:id - absent fields keep their stored values, 204 on success
pub async fn course_put(
    principal: Principal,
    Path(id): Path<String>,
    State(store): State<Store>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> ApiResult<()> {
    let id = parse_course_id(&id)?;
    let input = parse_body(payload)?;

    store.courses.update(id, input).await.map_err(course_error)?;
    tracing::info!("User {} updated course {}", principal.id, id);

    Ok(ApiResponse::no_content())
}

/// DELETE /api/courses/:id - 204 on success
pub async fn course_delete(
    principal: Principal,
    Path(id): Path<String>,
    State(store): State<Store>,
) -> ApiResult<()> {
    let id = parse_course_id(&id)?;

    store.courses.delete(id).await.map_err(course_error)?;
    tracing::info!("User {} deleted course {}", principal.id, id);

    Ok(ApiResponse::no_content())
}
