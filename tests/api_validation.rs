//! Requests the API rejects before touching the database.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{error_fields, offline_app, raw, send};
use serde_json::json;

#[tokio::test]
async fn health_and_version_respond() {
    let app = offline_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "school-registry");

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"], "School Registry");
}

#[tokio::test]
async fn openapi_document_lists_entity_paths() {
    let (status, body) = send(&offline_app(), Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    for p in [
        "/api/v1/students",
        "/api/v1/students/{id}",
        "/api/v1/courses/{id}",
        "/api/v1/grades/student/{student_id}",
        "/api/v1/grades/course/{course_id}",
    ] {
        assert!(paths.contains_key(p), "missing {}", p);
    }
}

#[tokio::test]
async fn invalid_student_lists_every_bad_field() {
    let body = json!({"name": "Al", "email": "not-an-email", "birth_date": "31/02/2000"});
    let (status, resp) = send(&offline_app(), Method::POST, "/api/v1/students", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["error"]["code"], "validation_error");
    let fields = error_fields(&resp);
    for f in ["name", "email", "enrollment", "birth_date"] {
        assert!(fields.contains(&f.to_string()), "{:?} lacks {}", fields, f);
    }
}

#[tokio::test]
async fn future_birth_date_is_rejected() {
    let body = json!({
        "name": "Ana Lima",
        "email": "ana@school.edu",
        "enrollment": "2024001",
        "birth_date": "2999-01-01"
    });
    let (status, resp) = send(&offline_app(), Method::POST, "/api/v1/alunos", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&resp), vec!["birth_date"]);
}

#[tokio::test]
async fn course_workload_must_be_in_range() {
    let body = json!({"codigo": "MAT101", "nome": "Calculus I", "carga_horaria": 0});
    let (status, resp) = send(&offline_app(), Method::POST, "/api/v1/disciplinas", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&resp), vec!["workload"]);
}

#[tokio::test]
async fn grade_score_and_semester_are_checked() {
    let body = json!({"student_id": 1, "course_id": 1, "score": 10.5, "semester": "2024.3"});
    let (status, resp) = send(&offline_app(), Method::POST, "/api/v1/grades", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = error_fields(&resp);
    assert!(fields.contains(&"score".to_string()));
    assert!(fields.contains(&"semester".to_string()));

    let (status, resp) = send(
        &offline_app(),
        Method::PUT,
        "/api/v1/notas/3",
        Some(json!({"valor": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&resp), vec!["score"]);
}

#[tokio::test]
async fn wrongly_typed_body_is_unprocessable() {
    let body = json!({"code": "MAT101", "name": "Calculus I", "workload": "sixty"});
    let (status, resp) = send(&offline_app(), Method::POST, "/api/v1/courses", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&resp), vec!["body"]);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/students")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    assert_eq!(raw(&offline_app(), req).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_ids_are_bad_requests() {
    let app = offline_app();
    for uri in ["/api/v1/students/abc", "/api/v1/courses/0", "/api/v1/grades/student/-4"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "bad_request");
    }
    let (status, _) = send(&app, Method::DELETE, "/api/v1/grades/x1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_pagination_is_a_bad_request() {
    let (status, body) = send(&offline_app(), Method::GET, "/api/v1/students?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let big = vec![b' '; 2 * 1024 * 1024];
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/students")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, big.len())
        .body(Body::from(big))
        .unwrap();
    assert_eq!(raw(&offline_app(), req).await, StatusCode::PAYLOAD_TOO_LARGE);
}
