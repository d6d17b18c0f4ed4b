//! Field rules for students, courses and grades. Pure functions: uniqueness and reference checks
//! need the database and live in the entity services.

use crate::error::{AppError, FieldError};
use crate::model::*;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email pattern")
});

static SEMESTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}\.[12]$").expect("semester pattern"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;
pub const MAX_WORKLOAD: i64 = 1000;

/// Accumulates every offending field so a single response can report all of them.
#[derive(Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Trimmed value of a required text field; records a violation when absent or blank.
    fn required(&mut self, field: &str, value: &Option<String>) -> Option<String> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                self.push(field, format!("{} is required", field));
                None
            }
        }
    }

    /// Trimmed value of an optional text field; present but blank is a violation.
    fn present(&mut self, field: &str, value: &Option<String>) -> Option<String> {
        let v = value.as_deref()?.trim();
        if v.is_empty() {
            self.push(field, format!("{} must not be empty", field));
            return None;
        }
        Some(v.to_string())
    }

    fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> bool {
        let n = value.chars().count();
        if n < min {
            self.push(field, format!("{} must be at least {} characters", field, min));
            false
        } else if n > max {
            self.push(field, format!("{} must be at most {} characters", field, max));
            false
        } else {
            true
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, AppError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

pub fn is_valid_email(s: &str) -> bool {
    s.len() <= 100 && EMAIL.is_match(s)
}

pub fn is_valid_semester(s: &str) -> bool {
    SEMESTER.is_match(s)
}

/// Parse a calendar date in ISO form or day-first with slashes.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Scores are stored with two decimal places.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

fn check_name(v: &mut Violations, name: &str) {
    v.length("name", name, 3, 100);
}

fn check_email(v: &mut Violations, email: &str) {
    if !is_valid_email(email) {
        v.push("email", "email must be a valid address");
    }
}

fn check_enrollment(v: &mut Violations, enrollment: &str) {
    v.length("enrollment", enrollment, 5, 20);
}

fn check_birth_date(v: &mut Violations, raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    match parse_date(raw) {
        Some(d) if d < today => Some(d),
        Some(_) => {
            v.push("birth_date", "birth_date must be in the past");
            None
        }
        None => {
            v.push("birth_date", "birth_date must be a date (YYYY-MM-DD)");
            None
        }
    }
}

fn check_workload(v: &mut Violations, workload: i64) -> Option<i32> {
    if workload <= 0 || workload > MAX_WORKLOAD {
        v.push(
            "workload",
            format!("workload must be a positive integer up to {}", MAX_WORKLOAD),
        );
        return None;
    }
    i32::try_from(workload).ok()
}

fn check_score(v: &mut Violations, score: f64) -> Option<f64> {
    if !is_valid_score(score) {
        v.push(
            "score",
            format!("score must be between {} and {}", MIN_SCORE, MAX_SCORE),
        );
        return None;
    }
    Some(round_score(score))
}

fn check_semester(v: &mut Violations, semester: &str) {
    if !is_valid_semester(semester) {
        v.push("semester", "semester must look like 2024.1 or 2024.2");
    }
}

pub fn new_student(input: &NewStudent, today: NaiveDate) -> Result<StudentFields, AppError> {
    let mut v = Violations::default();
    let name = v.required("name", &input.name);
    if let Some(n) = &name {
        check_name(&mut v, n);
    }
    let email = v.required("email", &input.email);
    if let Some(e) = &email {
        check_email(&mut v, e);
    }
    let enrollment = v.required("enrollment", &input.enrollment);
    if let Some(e) = &enrollment {
        check_enrollment(&mut v, e);
    }
    let birth_date = v
        .present("birth_date", &input.birth_date)
        .and_then(|raw| check_birth_date(&mut v, &raw, today));
    v.finish(|| StudentFields {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        enrollment: enrollment.unwrap_or_default(),
        birth_date,
    })
}

pub fn student_changes(input: &StudentUpdate, today: NaiveDate) -> Result<StudentChanges, AppError> {
    let mut v = Violations::default();
    let name = v.present("name", &input.name);
    if let Some(n) = &name {
        check_name(&mut v, n);
    }
    let email = v.present("email", &input.email);
    if let Some(e) = &email {
        check_email(&mut v, e);
    }
    let enrollment = v.present("enrollment", &input.enrollment);
    if let Some(e) = &enrollment {
        check_enrollment(&mut v, e);
    }
    let birth_date = v
        .present("birth_date", &input.birth_date)
        .and_then(|raw| check_birth_date(&mut v, &raw, today));
    v.finish(|| StudentChanges {
        name,
        email,
        enrollment,
        birth_date,
    })
}

pub fn new_course(input: &NewCourse) -> Result<CourseFields, AppError> {
    let mut v = Violations::default();
    let code = v.required("code", &input.code);
    if let Some(c) = &code {
        v.length("code", c, 3, 20);
    }
    let name = v.required("name", &input.name);
    if let Some(n) = &name {
        check_name(&mut v, n);
    }
    let workload = match input.workload {
        Some(w) => check_workload(&mut v, w),
        None => {
            v.push("workload", "workload is required");
            None
        }
    };
    v.finish(|| CourseFields {
        code: code.unwrap_or_default(),
        name: name.unwrap_or_default(),
        workload: workload.unwrap_or_default(),
    })
}

pub fn course_changes(input: &CourseUpdate) -> Result<CourseChanges, AppError> {
    let mut v = Violations::default();
    let code = v.present("code", &input.code);
    if let Some(c) = &code {
        v.length("code", c, 3, 20);
    }
    let name = v.present("name", &input.name);
    if let Some(n) = &name {
        check_name(&mut v, n);
    }
    let workload = input.workload.and_then(|w| check_workload(&mut v, w));
    v.finish(|| CourseChanges {
        code,
        name,
        workload,
    })
}

pub fn new_grade(input: &NewGrade) -> Result<GradeFields, AppError> {
    let mut v = Violations::default();
    if input.student_id.is_none() {
        v.push("student_id", "student_id is required");
    }
    if input.course_id.is_none() {
        v.push("course_id", "course_id is required");
    }
    let score = match input.score {
        Some(s) => check_score(&mut v, s),
        None => {
            v.push("score", "score is required");
            None
        }
    };
    let semester = v.required("semester", &input.semester);
    if let Some(s) = &semester {
        check_semester(&mut v, s);
    }
    v.finish(|| GradeFields {
        student_id: input.student_id.unwrap_or_default(),
        course_id: input.course_id.unwrap_or_default(),
        score: score.unwrap_or_default(),
        semester: semester.unwrap_or_default(),
    })
}

pub fn grade_changes(input: &GradeUpdate) -> Result<GradeChanges, AppError> {
    let mut v = Violations::default();
    let score = input.score.and_then(|s| check_score(&mut v, s));
    let semester = v.present("semester", &input.semester);
    if let Some(s) = &semester {
        check_semester(&mut v, s);
    }
    v.finish(|| GradeChanges { score, semester })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn fields(err: AppError) -> Vec<String> {
        err.field_errors().iter().map(|f| f.field.clone()).collect()
    }

    fn student() -> NewStudent {
        NewStudent {
            name: Some("João Silva".into()),
            email: Some("joao.silva@email.com".into()),
            enrollment: Some("2024001".into()),
            birth_date: Some("2000-05-15".into()),
        }
    }

    #[test]
    fn valid_student_passes_through_unchanged() {
        let f = new_student(&student(), today()).unwrap();
        assert_eq!(f.name, "João Silva");
        assert_eq!(f.email, "joao.silva@email.com");
        assert_eq!(f.enrollment, "2024001");
        assert_eq!(f.birth_date, NaiveDate::from_ymd_opt(2000, 5, 15));
    }

    #[test]
    fn every_missing_student_field_is_reported() {
        let err = new_student(&NewStudent::default(), today()).unwrap_err();
        assert_eq!(fields(err), ["name", "email", "enrollment"]);
    }

    #[test]
    fn student_field_rules() {
        let mut s = student();
        s.name = Some("  ".into());
        s.email = Some("joao.silva@".into());
        s.enrollment = Some("123".into());
        s.birth_date = Some("2030-01-01".into());
        let err = new_student(&s, today()).unwrap_err();
        assert_eq!(fields(err), ["name", "email", "enrollment", "birth_date"]);
    }

    #[test]
    fn birth_date_accepts_day_first_format() {
        let mut s = student();
        s.birth_date = Some("15/05/2000".into());
        let f = new_student(&s, today()).unwrap();
        assert_eq!(f.birth_date, NaiveDate::from_ymd_opt(2000, 5, 15));

        s.birth_date = Some("2000-13-40".into());
        assert!(new_student(&s, today()).is_err());

        s.birth_date = Some(today().format("%Y-%m-%d").to_string());
        assert!(new_student(&s, today()).is_err());
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("ana@school.edu.br"));
        assert!(is_valid_email("first.last+tag@example.org"));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("space in@example.com"));
    }

    #[test]
    fn empty_update_is_valid() {
        let c = student_changes(&StudentUpdate::default(), today()).unwrap();
        assert_eq!(c, StudentChanges::default());
    }

    #[test]
    fn update_rejects_blank_present_fields() {
        let u = StudentUpdate {
            name: Some("".into()),
            ..Default::default()
        };
        let err = student_changes(&u, today()).unwrap_err();
        assert_eq!(fields(err), ["name"]);
    }

    #[test]
    fn course_rules() {
        let ok = NewCourse {
            code: Some("MAT101".into()),
            name: Some("Calculus I".into()),
            workload: Some(60),
        };
        assert_eq!(new_course(&ok).unwrap().workload, 60);

        let bad = NewCourse {
            code: Some("M1".into()),
            name: None,
            workload: Some(0),
        };
        assert_eq!(fields(new_course(&bad).unwrap_err()), ["code", "name", "workload"]);

        let too_long = CourseUpdate {
            workload: Some(1001),
            ..Default::default()
        };
        assert!(course_changes(&too_long).is_err());
    }

    #[test]
    fn score_bounds_are_inclusive() {
        let grade = |score: f64| NewGrade {
            student_id: Some(1),
            course_id: Some(1),
            score: Some(score),
            semester: Some("2024.1".into()),
        };
        assert_eq!(new_grade(&grade(0.0)).unwrap().score, 0.0);
        assert_eq!(new_grade(&grade(10.0)).unwrap().score, 10.0);
        assert_eq!(fields(new_grade(&grade(-1.0)).unwrap_err()), ["score"]);
        assert_eq!(fields(new_grade(&grade(10.5)).unwrap_err()), ["score"]);
        assert_eq!(new_grade(&grade(7.456)).unwrap().score, 7.46);
    }

    #[test]
    fn semester_pattern() {
        assert!(is_valid_semester("2024.1"));
        assert!(is_valid_semester("1999.2"));
        assert!(!is_valid_semester("2024.3"));
        assert!(!is_valid_semester("24.1"));
        assert!(!is_valid_semester("2024-1"));

        let u = GradeUpdate {
            score: None,
            semester: Some("spring".into()),
        };
        assert_eq!(fields(grade_changes(&u).unwrap_err()), ["semester"]);
    }

    #[test]
    fn missing_grade_references_are_reported() {
        let g = NewGrade {
            score: Some(5.0),
            semester: Some("2024.2".into()),
            ..Default::default()
        };
        assert_eq!(fields(new_grade(&g).unwrap_err()), ["student_id", "course_id"]);
    }
}
