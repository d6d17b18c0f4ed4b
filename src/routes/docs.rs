//! OpenAPI document for the REST surface.

use crate::error::{ErrorBody, ErrorDetail, FieldError};
use crate::handlers::{courses, grades, students};
use crate::model::*;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "School Registry", description = "Students, courses and grades"),
    paths(
        students::list, students::read, students::create, students::update, students::delete,
        courses::list, courses::read, courses::create, courses::update, courses::delete,
        grades::list, grades::read, grades::by_student, grades::by_course,
        grades::create, grades::update, grades::delete,
    ),
    components(schemas(
        Student, NewStudent, StudentUpdate,
        Course, NewCourse, CourseUpdate,
        Grade, NewGrade, GradeUpdate,
        ErrorBody, ErrorDetail, FieldError,
    )),
    tags(
        (name = "students", description = "Student enrollment"),
        (name = "courses", description = "Course catalogue"),
        (name = "grades", description = "Grades per student, course and semester"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn docs_routes() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
