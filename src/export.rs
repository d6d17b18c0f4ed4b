//! Render listings of records as TXT, CSV or JSON.
//!
//! Output is built in memory; [`write_atomic`] puts it on disk through a temporary file and a
//! rename so a failed export never leaves a partial file behind.

use crate::model::{Course, Grade, GradeReport, Student};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const RULE_WIDTH: usize = 80;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("unsupported export format: {0} (expected txt, csv or json)")]
    UnsupportedFormat(String),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output is not utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One exported value. `Missing` prints as `N/A` in text, empty in CSV, `null` in JSON.
/// `Float` always prints with two decimals so score columns line up.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Cell {
    fn csv_text(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{:.2}", x),
            Cell::Text(s) => f.write_str(s),
            Cell::Missing => f.write_str("N/A"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Int(n) => serializer.serialize_i64(*n),
            Cell::Float(x) => serializer.serialize_f64(*x),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// A field of an exportable record: the key used in CSV headers and JSON, and the label
/// used in text output.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> Field {
    Field { key, label }
}

/// A record type that can be listed in an export.
pub trait Exportable {
    /// Banner line of the text export.
    const TITLE: &'static str;

    fn fields() -> &'static [Field];

    /// One cell per entry of [`Exportable::fields`], in the same order.
    fn cells(&self) -> Vec<Cell>;
}

impl Exportable for Student {
    const TITLE: &'static str = "STUDENTS";

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            field("id", "ID"),
            field("name", "Name"),
            field("email", "Email"),
            field("enrollment", "Enrollment"),
            field("birth_date", "Birth date"),
        ];
        FIELDS
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(self.id),
            Cell::Text(self.name.clone()),
            Cell::Text(self.email.clone()),
            Cell::Text(self.enrollment.clone()),
            self.birth_date
                .map(|d| Cell::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Cell::Missing),
        ]
    }
}

impl Exportable for Course {
    const TITLE: &'static str = "COURSES";

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            field("id", "ID"),
            field("code", "Code"),
            field("name", "Name"),
            field("workload", "Workload"),
        ];
        FIELDS
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(self.id),
            Cell::Text(self.code.clone()),
            Cell::Text(self.name.clone()),
            Cell::Int(i64::from(self.workload)),
        ]
    }
}

impl Exportable for Grade {
    const TITLE: &'static str = "GRADES";

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            field("id", "ID"),
            field("student_id", "Student"),
            field("course_id", "Course"),
            field("score", "Score"),
            field("semester", "Semester"),
        ];
        FIELDS
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(self.id),
            Cell::Int(self.student_id),
            Cell::Int(self.course_id),
            Cell::Float(self.score),
            Cell::Text(self.semester.clone()),
        ]
    }
}

impl Exportable for GradeReport {
    const TITLE: &'static str = "GRADES";

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            field("student_name", "Student"),
            field("course_name", "Course"),
            field("score", "Score"),
            field("semester", "Semester"),
        ];
        FIELDS
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.student_name.clone()),
            Cell::Text(self.course_name.clone()),
            Cell::Float(self.score),
            Cell::Text(self.semester.clone()),
        ]
    }
}

/// A record serialized as a JSON object with keys in field order.
struct Row<'a> {
    fields: &'static [Field],
    cells: &'a [Cell],
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (f, c) in self.fields.iter().zip(self.cells) {
            map.serialize_entry(f.key, c)?;
        }
        map.end()
    }
}

/// Render `records` in `format`. Record order and field order are preserved; an empty
/// listing is never an error.
pub fn render<T: Exportable>(records: &[T], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Txt => Ok(render_txt(records)),
        ExportFormat::Csv => render_csv(records),
        ExportFormat::Json => render_json(records),
    }
}

fn render_txt<T: Exportable>(records: &[T]) -> String {
    let banner = "=".repeat(RULE_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!("{}\n{}\n{}\n\n", banner, T::TITLE, banner);
    for record in records {
        for (f, c) in T::fields().iter().zip(record.cells()) {
            out.push_str(&format!("{}: {}\n", f.label, c));
        }
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

fn render_csv<T: Exportable>(records: &[T]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::fields().iter().map(|f| f.key))?;
    for record in records {
        writer.write_record(record.cells().iter().map(Cell::csv_text))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn render_json<T: Exportable>(records: &[T]) -> Result<String, ExportError> {
    let cells: Vec<Vec<Cell>> = records.iter().map(|r| r.cells()).collect();
    let rows: Vec<Row<'_>> = cells
        .iter()
        .map(|c| Row {
            fields: T::fields(),
            cells: c,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Write `contents` to `path` by way of a sibling temporary file, then rename over the target.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ExportError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));
    let result = (|| -> std::io::Result<()> {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn student(id: i64, name: &str, birth: Option<NaiveDate>) -> Student {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Student {
            id,
            name: name.to_string(),
            email: format!("{}@school.edu", name.to_lowercase().replace(' ', ".")),
            enrollment: format!("2024{:04}", id),
            birth_date: birth,
            created_at: at,
            updated_at: at,
        }
    }

    fn report(student: &str, score: f64) -> GradeReport {
        GradeReport {
            student_name: student.to_string(),
            course_name: "Algorithms, Part I".to_string(),
            score,
            semester: "2024.1".to_string(),
        }
    }

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert_eq!(" csv ".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        let err = "xml".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "xml"));
    }

    #[test]
    fn txt_lists_labels_and_marks_missing_values() {
        let birth = NaiveDate::from_ymd_opt(2001, 5, 17);
        let out = render(
            &[student(1, "Ana Lima", birth), student(2, "Bruno Souza", None)],
            ExportFormat::Txt,
        )
        .unwrap();
        let banner = "=".repeat(80);
        assert!(out.starts_with(&format!("{}\nSTUDENTS\n{}\n\n", banner, banner)));
        assert!(out.contains("ID: 1\nName: Ana Lima\nEmail: ana.lima@school.edu\n"));
        assert!(out.contains("Birth date: 2001-05-17\n"));
        assert!(out.contains("Name: Bruno Souza\n"));
        assert!(out.contains("Birth date: N/A\n"));
        assert_eq!(out.matches(&"-".repeat(80)).count(), 2);
        assert!(out.find("Ana Lima").unwrap() < out.find("Bruno Souza").unwrap());
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let out = render(&[report("Ana Lima", 8.5)], ExportFormat::Csv).unwrap();
        assert_eq!(
            out,
            "student_name,course_name,score,semester\nAna Lima,\"Algorithms, Part I\",8.50,2024.1\n"
        );
    }

    #[test]
    fn csv_leaves_missing_values_empty() {
        let out = render(&[student(3, "Caio Reis", None)], ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,name,email,enrollment,birth_date");
        assert_eq!(lines[1], "3,Caio Reis,caio.reis@school.edu,20240003,");
    }

    #[test]
    fn json_keeps_field_order_and_types() {
        let out = render(&[report("Ana Lima", 9.25)], ExportFormat::Json).unwrap();
        let name_at = out.find("student_name").unwrap();
        assert!(name_at < out.find("course_name").unwrap());
        assert!(out.find("score").unwrap() < out.find("semester").unwrap());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["score"], serde_json::json!(9.25));
        assert_eq!(value[0]["semester"], "2024.1");

        let out = render(&[student(4, "Dora Melo", None)], ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value[0]["birth_date"].is_null());
        assert_eq!(value[0]["id"], 4);
    }

    #[test]
    fn empty_listing_renders_skeleton() {
        let none: [Course; 0] = [];
        let txt = render(&none, ExportFormat::Txt).unwrap();
        assert_eq!(txt, format!("{0}\nCOURSES\n{0}\n\n", "=".repeat(80)));
        assert_eq!(render(&none, ExportFormat::Csv).unwrap(), "id,code,name,workload\n");
        assert_eq!(render(&none, ExportFormat::Json).unwrap(), "[]");
    }

    #[test]
    fn whole_scores_keep_two_decimals() {
        let out = render(&[report("Ana Lima", 8.0), report("Bruno Souza", 10.0)], ExportFormat::Txt).unwrap();
        assert!(out.contains("Score: 8.00\n"));
        assert!(out.contains("Score: 10.00\n"));
        let csv = render(&[report("Ana Lima", 7.0)], ExportFormat::Csv).unwrap();
        assert!(csv.ends_with(",7.00,2024.1\n"));
        let json = render(&[report("Ana Lima", 7.0)], ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["score"], serde_json::json!(7.0));
    }

    #[test]
    fn atomic_write_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        write_atomic(&path, "old\n").unwrap();
        write_atomic(&path, "new\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
        assert!(!dir.path().join(".grades.csv.tmp").exists());
    }
}
