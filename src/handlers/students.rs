use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{ApiJson, PageParams, Pagination};
use crate::model::{NewStudent, Student, StudentUpdate};
use crate::response;
use crate::service::StudentService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(PageParams),
    responses(
        (status = 200, description = "Students ordered by id", body = Vec<Student>),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    ),
    tag = "students"
)]
pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<impl IntoResponse, AppError> {
    let rows = StudentService::list(&state.pool, &state.catalog, page).await?;
    Ok(response::ok_many(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "The student", body = Student),
        (status = 404, description = "No such student", body = ErrorBody)
    ),
    tag = "students"
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = StudentService::get(&state.pool, &state.catalog, id).await?;
    Ok(response::ok(row))
}

#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student enrolled", body = Student),
        (status = 422, description = "Invalid or duplicate fields", body = ErrorBody)
    ),
    tag = "students"
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let row = StudentService::create(&state.pool, &state.catalog, &body).await?;
    Ok(response::created(row))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    request_body = StudentUpdate,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "No such student", body = ErrorBody),
        (status = 422, description = "Invalid or duplicate fields", body = ErrorBody)
    ),
    tag = "students"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<StudentUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = StudentService::update(&state.pool, &state.catalog, id, &body).await?;
    Ok(response::ok(row))
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "No such student", body = ErrorBody),
        (status = 409, description = "Student has grades and the delete policy is restrict", body = ErrorBody)
    ),
    tag = "students"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    StudentService::delete(&state.pool, &state.catalog, state.delete_policy, id).await?;
    Ok(response::no_content())
}
