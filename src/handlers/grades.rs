use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{ApiJson, PageParams, Pagination};
use crate::model::{Grade, GradeUpdate, NewGrade};
use crate::response;
use crate::service::GradeService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/v1/grades",
    params(PageParams),
    responses(
        (status = 200, description = "Grades ordered by id", body = Vec<Grade>),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    ),
    tag = "grades"
)]
pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<impl IntoResponse, AppError> {
    let rows = GradeService::list(&state.pool, &state.catalog, page).await?;
    Ok(response::ok_many(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    responses(
        (status = 200, description = "The grade", body = Grade),
        (status = 404, description = "No such grade", body = ErrorBody)
    ),
    tag = "grades"
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = GradeService::get(&state.pool, &state.catalog, id).await?;
    Ok(response::ok(row))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/student/{student_id}",
    params(("student_id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "All grades of the student", body = Vec<Grade>),
        (status = 404, description = "No such student", body = ErrorBody)
    ),
    tag = "grades"
)]
pub async fn by_student(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = parse_id(&id_str)?;
    let rows = GradeService::list_by_student(&state.pool, &state.catalog, student_id).await?;
    Ok(response::ok_many(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/course/{course_id}",
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "All grades in the course", body = Vec<Grade>),
        (status = 404, description = "No such course", body = ErrorBody)
    ),
    tag = "grades"
)]
pub async fn by_course(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let course_id = parse_id(&id_str)?;
    let rows = GradeService::list_by_course(&state.pool, &state.catalog, course_id).await?;
    Ok(response::ok_many(rows))
}

#[utoipa::path(
    post,
    path = "/api/v1/grades",
    request_body = NewGrade,
    responses(
        (status = 201, description = "Grade recorded", body = Grade),
        (status = 422, description = "Invalid fields, unknown student/course or duplicate semester", body = ErrorBody)
    ),
    tag = "grades"
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewGrade>,
) -> Result<impl IntoResponse, AppError> {
    let row = GradeService::create(&state.pool, &state.catalog, &body).await?;
    Ok(response::created(row))
}

#[utoipa::path(
    put,
    path = "/api/v1/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    request_body = GradeUpdate,
    responses(
        (status = 200, description = "Grade updated", body = Grade),
        (status = 404, description = "No such grade", body = ErrorBody),
        (status = 422, description = "Invalid fields or duplicate semester", body = ErrorBody)
    ),
    tag = "grades"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<GradeUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = GradeService::update(&state.pool, &state.catalog, id, &body).await?;
    Ok(response::ok(row))
}

#[utoipa::path(
    delete,
    path = "/api/v1/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    responses(
        (status = 204, description = "Grade deleted"),
        (status = 404, description = "No such grade", body = ErrorBody)
    ),
    tag = "grades"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    GradeService::delete(&state.pool, &state.catalog, id).await?;
    Ok(response::no_content())
}
