//! Blocking HTTP client for the registry API. One request per call; no state besides the base URL.

use school_registry::error::{ErrorBody, FieldError};
use school_registry::export::ExportError;
use school_registry::model::{
    Course, CourseUpdate, Grade, GradeReport, GradeUpdate, NewCourse, NewGrade, NewStudent, Student,
    StudentUpdate,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Page size used when walking a whole collection.
const FETCH_LIMIT: usize = 1000;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        details: Vec<FieldError>,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ClientError {
    pub fn details(&self) -> &[FieldError] {
        match self {
            ClientError::Api { details, .. } => details,
            _ => &[],
        }
    }
}

pub struct ApiClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api/v1`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(ApiClient {
            base: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Server root: the base URL without its `/api/v1` suffix.
    fn root(&self) -> &str {
        self.base.strip_suffix("/api/v1").unwrap_or(self.base.as_str())
    }

    fn decode<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<T, ClientError> {
        let resp = Self::check(resp)?;
        Ok(resp.json()?)
    }

    fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Err(ClientError::Api {
                status: status.as_u16(),
                code: body.error.code,
                message: body.error.message,
                details: body.error.details.unwrap_or_default(),
            }),
            Err(_) => Err(ClientError::Api {
                status: status.as_u16(),
                code: status.canonical_reason().unwrap_or("ERROR").to_string(),
                message: text,
                details: Vec::new(),
            }),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!(path, "GET");
        Self::decode(self.http.get(self.url(path)).send()?)
    }

    /// Every row of a collection, fetched page by page.
    fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let mut rows = Vec::new();
        loop {
            let page: Vec<T> = self.get(&format!("{}?offset={}&limit={}", path, rows.len(), FETCH_LIMIT))?;
            let done = page.len() < FETCH_LIMIT;
            rows.extend(page);
            if done {
                return Ok(rows);
            }
        }
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        tracing::debug!(path, "POST");
        Self::decode(self.http.post(self.url(path)).json(body).send()?)
    }

    fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        tracing::debug!(path, "PUT");
        Self::decode(self.http.put(self.url(path)).json(body).send()?)
    }

    fn delete(&self, path: &str) -> Result<(), ClientError> {
        tracing::debug!(path, "DELETE");
        Self::check(self.http.delete(self.url(path)).send()?)?;
        Ok(())
    }

    pub fn health(&self) -> Result<serde_json::Value, ClientError> {
        let resp = self.http.get(format!("{}/health", self.root())).send()?;
        Self::decode(resp)
    }

    pub fn students(&self) -> Result<Vec<Student>, ClientError> {
        self.get_all("/students")
    }

    pub fn student(&self, id: i64) -> Result<Student, ClientError> {
        self.get(&format!("/students/{}", id))
    }

    pub fn create_student(&self, input: &NewStudent) -> Result<Student, ClientError> {
        self.post("/students", input)
    }

    pub fn update_student(&self, id: i64, input: &StudentUpdate) -> Result<Student, ClientError> {
        self.put(&format!("/students/{}", id), input)
    }

    pub fn delete_student(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/students/{}", id))
    }

    pub fn courses(&self) -> Result<Vec<Course>, ClientError> {
        self.get_all("/courses")
    }

    pub fn course(&self, id: i64) -> Result<Course, ClientError> {
        self.get(&format!("/courses/{}", id))
    }

    pub fn create_course(&self, input: &NewCourse) -> Result<Course, ClientError> {
        self.post("/courses", input)
    }

    pub fn update_course(&self, id: i64, input: &CourseUpdate) -> Result<Course, ClientError> {
        self.put(&format!("/courses/{}", id), input)
    }

    pub fn delete_course(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/courses/{}", id))
    }

    pub fn grades(&self) -> Result<Vec<Grade>, ClientError> {
        self.get_all("/grades")
    }

    pub fn grade(&self, id: i64) -> Result<Grade, ClientError> {
        self.get(&format!("/grades/{}", id))
    }

    pub fn grades_of_student(&self, student_id: i64) -> Result<Vec<Grade>, ClientError> {
        self.get(&format!("/grades/student/{}", student_id))
    }

    pub fn grades_of_course(&self, course_id: i64) -> Result<Vec<Grade>, ClientError> {
        self.get(&format!("/grades/course/{}", course_id))
    }

    pub fn create_grade(&self, input: &NewGrade) -> Result<Grade, ClientError> {
        self.post("/grades", input)
    }

    pub fn update_grade(&self, id: i64, input: &GradeUpdate) -> Result<Grade, ClientError> {
        self.put(&format!("/grades/{}", id), input)
    }

    pub fn delete_grade(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/grades/{}", id))
    }

    /// Attach student and course names to `grades`, fetching both listings once.
    pub fn resolve_names(&self, grades: &[Grade]) -> Result<Vec<(i64, GradeReport)>, ClientError> {
        let students: HashMap<i64, String> = self.students()?.into_iter().map(|s| (s.id, s.name)).collect();
        let courses: HashMap<i64, String> = self.courses()?.into_iter().map(|c| (c.id, c.name)).collect();
        Ok(name_grades(grades, &students, &courses))
    }
}

/// Pair each grade id with a report row. Ids with no known name print as `#<id>`.
pub fn name_grades(
    grades: &[Grade],
    students: &HashMap<i64, String>,
    courses: &HashMap<i64, String>,
) -> Vec<(i64, GradeReport)> {
    let name = |names: &HashMap<i64, String>, id: i64| names.get(&id).cloned().unwrap_or_else(|| format!("#{}", id));
    grades
        .iter()
        .map(|g| {
            (
                g.id,
                GradeReport {
                    student_name: name(students, g.student_id),
                    course_name: name(courses, g.course_id),
                    score: g.score,
                    semester: g.semester.clone(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    fn student_json(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": format!("s{}@school.edu", id),
            "enrollment": format!("2024{:04}", id),
            "birth_date": null,
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z"
        })
    }

    /// Serve `app` on an ephemeral port from its own thread; returns the API base URL.
    fn spawn(app: Router) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        listener.set_nonblocking(true).unwrap();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });
        format!("http://{}/api/v1", addr)
    }

    #[test]
    fn decodes_records_and_health() {
        let app = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
            .route(
                "/api/v1/students/:id",
                get(|Path(id): Path<i64>| async move { Json(student_json(id, "Ana Lima")) }),
            );
        let client = ApiClient::new(&spawn(app)).unwrap();
        assert_eq!(client.health().unwrap()["status"], "ok");
        let s = client.student(7).unwrap();
        assert_eq!(s.id, 7);
        assert_eq!(s.name, "Ana Lima");
        assert!(s.birth_date.is_none());
    }

    #[test]
    fn api_errors_carry_field_details() {
        let app = Router::new().route(
            "/api/v1/students",
            get(|| async { Json(json!([])) }).post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"error": {
                        "code": "VALIDATION_ERROR",
                        "message": "validation failed: email",
                        "details": [{"field": "email", "message": "invalid email"}]
                    }})),
                )
            }),
        );
        let client = ApiClient::new(&spawn(app)).unwrap();
        let err = client.create_student(&NewStudent::default()).unwrap_err();
        match &err {
            ClientError::Api { status, code, .. } => {
                assert_eq!(*status, 422);
                assert_eq!(code, "VALIDATION_ERROR");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.details(), &[FieldError::new("email", "invalid email")]);
    }

    #[test]
    fn listing_walks_every_page() {
        let app = Router::new().route(
            "/api/v1/students",
            get(|Query(q): Query<HashMap<String, usize>>| async move {
                let offset = q["offset"];
                let total = FETCH_LIMIT + 3;
                let end = (offset + q["limit"]).min(total);
                let rows: Vec<Value> = (offset..end).map(|i| student_json(i as i64 + 1, "Student")).collect();
                Json(rows)
            }),
        );
        let client = ApiClient::new(&spawn(app)).unwrap();
        let all = client.students().unwrap();
        assert_eq!(all.len(), FETCH_LIMIT + 3);
        assert_eq!(all.last().unwrap().id, (FETCH_LIMIT + 3) as i64);
    }

    #[test]
    fn unknown_names_fall_back_to_ids() {
        let at = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let grade = Grade {
            id: 3,
            student_id: 1,
            course_id: 9,
            score: 7.5,
            semester: "2024.2".into(),
            created_at: at,
            updated_at: at,
        };
        let students = HashMap::from([(1, "Ana Lima".to_string())]);
        let rows = name_grades(&[grade], &students, &HashMap::new());
        assert_eq!(rows[0].0, 3);
        assert_eq!(rows[0].1.student_name, "Ana Lima");
        assert_eq!(rows[0].1.course_name, "#9");
    }
}
