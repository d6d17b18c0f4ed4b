use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{ApiJson, PageParams, Pagination};
use crate::model::{Course, CourseUpdate, NewCourse};
use crate::response;
use crate::service::CourseService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(PageParams),
    responses(
        (status = 200, description = "Courses ordered by id", body = Vec<Course>),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    ),
    tag = "courses"
)]
pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<impl IntoResponse, AppError> {
    let rows = CourseService::list(&state.pool, &state.catalog, page).await?;
    Ok(response::ok_many(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "The course", body = Course),
        (status = 404, description = "No such course", body = ErrorBody)
    ),
    tag = "courses"
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = CourseService::get(&state.pool, &state.catalog, id).await?;
    Ok(response::ok(row))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = NewCourse,
    responses(
        (status = 201, description = "Course enrolled", body = Course),
        (status = 422, description = "Invalid or duplicate fields", body = ErrorBody)
    ),
    tag = "courses"
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCourse>,
) -> Result<impl IntoResponse, AppError> {
    let row = CourseService::create(&state.pool, &state.catalog, &body).await?;
    Ok(response::created(row))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    request_body = CourseUpdate,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 404, description = "No such course", body = ErrorBody),
        (status = 422, description = "Invalid or duplicate fields", body = ErrorBody)
    ),
    tag = "courses"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<CourseUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = CourseService::update(&state.pool, &state.catalog, id, &body).await?;
    Ok(response::ok(row))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "No such course", body = ErrorBody),
        (status = 409, description = "Course has grades and the delete policy is restrict", body = ErrorBody)
    ),
    tag = "courses"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    CourseService::delete(&state.pool, &state.catalog, state.delete_policy, id).await?;
    Ok(response::no_content())
}
