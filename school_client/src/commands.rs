//! Subcommands and their flags. Each action is one API call (listings that resolve names make
//! two more).

use crate::api::{ApiClient, ClientError};
use crate::output;
use clap::{Args, Parser, Subcommand};
use school_registry::export::{self, Exportable, ExportFormat};
use school_registry::model::{CourseUpdate, GradeReport, GradeUpdate, NewCourse, NewGrade, NewStudent, StudentUpdate};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "school-client", about = "Manage students, courses and grades through the registry API")]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "SCHOOL_API_URL", default_value = "http://localhost:8000/api/v1")]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Students
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Courses
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Grades
    Grades {
        #[command(subcommand)]
        action: GradeAction,
    },
    /// Check that the server is up
    Health,
}

#[derive(Args, Debug, Default)]
pub struct StudentFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub enrollment: Option<String>,
    /// YYYY-MM-DD or DD/MM/YYYY
    #[arg(long)]
    pub birth_date: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct CourseFields {
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    /// Credit hours
    #[arg(long)]
    pub workload: Option<i64>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// txt, csv or json
    #[arg(long, short)]
    pub format: String,
    /// Target file; defaults to `<entity>_<timestamp>.<format>` in the current directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum StudentAction {
    List,
    Get { id: i64 },
    Create(StudentFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: StudentFields,
    },
    Delete { id: i64 },
    Export(ExportArgs),
}

#[derive(Subcommand, Debug)]
pub enum CourseAction {
    List,
    Get { id: i64 },
    Create(CourseFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: CourseFields,
    },
    Delete { id: i64 },
    Export(ExportArgs),
}

#[derive(Subcommand, Debug)]
pub enum GradeAction {
    List,
    Get { id: i64 },
    /// Grades of one student
    ByStudent { student_id: i64 },
    /// Grades in one course
    ByCourse { course_id: i64 },
    Create {
        #[arg(long)]
        student: Option<i64>,
        #[arg(long)]
        course: Option<i64>,
        #[arg(long)]
        score: Option<f64>,
        #[arg(long)]
        semester: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        score: Option<f64>,
        #[arg(long)]
        semester: Option<String>,
    },
    Delete { id: i64 },
    Export(ExportArgs),
}

impl From<StudentFields> for NewStudent {
    fn from(f: StudentFields) -> Self {
        NewStudent {
            name: f.name,
            email: f.email,
            enrollment: f.enrollment,
            birth_date: f.birth_date,
        }
    }
}

impl From<StudentFields> for StudentUpdate {
    fn from(f: StudentFields) -> Self {
        StudentUpdate {
            name: f.name,
            email: f.email,
            enrollment: f.enrollment,
            birth_date: f.birth_date,
        }
    }
}

impl From<CourseFields> for NewCourse {
    fn from(f: CourseFields) -> Self {
        NewCourse {
            code: f.code,
            name: f.name,
            workload: f.workload,
        }
    }
}

impl From<CourseFields> for CourseUpdate {
    fn from(f: CourseFields) -> Self {
        CourseUpdate {
            code: f.code,
            name: f.name,
            workload: f.workload,
        }
    }
}

impl Cli {
    /// Run the command and return what to print.
    pub fn run(self) -> Result<String, ClientError> {
        let client = ApiClient::new(&self.api_url)?;
        match self.command {
            Command::Students { action } => students(&client, action),
            Command::Courses { action } => courses(&client, action),
            Command::Grades { action } => grades(&client, action),
            Command::Health => Ok(client.health()?.to_string()),
        }
    }
}

fn students(client: &ApiClient, action: StudentAction) -> Result<String, ClientError> {
    Ok(match action {
        StudentAction::List => output::records(&client.students()?),
        StudentAction::Get { id } => output::records(&[client.student(id)?]),
        StudentAction::Create(fields) => {
            let s = client.create_student(&fields.into())?;
            format!("created student {}\n", s.id)
        }
        StudentAction::Update { id, fields } => {
            let s = client.update_student(id, &fields.into())?;
            format!("updated student {}\n", s.id)
        }
        StudentAction::Delete { id } => {
            client.delete_student(id)?;
            format!("deleted student {}\n", id)
        }
        StudentAction::Export(args) => export_to_file(&client.students()?, "students", args)?,
    })
}

fn courses(client: &ApiClient, action: CourseAction) -> Result<String, ClientError> {
    Ok(match action {
        CourseAction::List => output::records(&client.courses()?),
        CourseAction::Get { id } => output::records(&[client.course(id)?]),
        CourseAction::Create(fields) => {
            let c = client.create_course(&fields.into())?;
            format!("created course {}\n", c.id)
        }
        CourseAction::Update { id, fields } => {
            let c = client.update_course(id, &fields.into())?;
            format!("updated course {}\n", c.id)
        }
        CourseAction::Delete { id } => {
            client.delete_course(id)?;
            format!("deleted course {}\n", id)
        }
        CourseAction::Export(args) => export_to_file(&client.courses()?, "courses", args)?,
    })
}

fn grades(client: &ApiClient, action: GradeAction) -> Result<String, ClientError> {
    Ok(match action {
        GradeAction::List => output::grade_reports(&client.resolve_names(&client.grades()?)?),
        GradeAction::Get { id } => output::grade_reports(&client.resolve_names(&[client.grade(id)?])?),
        GradeAction::ByStudent { student_id } => {
            output::grade_reports(&client.resolve_names(&client.grades_of_student(student_id)?)?)
        }
        GradeAction::ByCourse { course_id } => {
            output::grade_reports(&client.resolve_names(&client.grades_of_course(course_id)?)?)
        }
        GradeAction::Create {
            student,
            course,
            score,
            semester,
        } => {
            let input = NewGrade {
                student_id: student,
                course_id: course,
                score,
                semester,
            };
            let g = client.create_grade(&input)?;
            format!("created grade {} ({:.2})\n", g.id, g.score)
        }
        GradeAction::Update { id, score, semester } => {
            let g = client.update_grade(id, &GradeUpdate { score, semester })?;
            format!("updated grade {} ({:.2})\n", g.id, g.score)
        }
        GradeAction::Delete { id } => {
            client.delete_grade(id)?;
            format!("deleted grade {}\n", id)
        }
        GradeAction::Export(args) => {
            let reports: Vec<GradeReport> = client
                .resolve_names(&client.grades()?)?
                .into_iter()
                .map(|(_, r)| r)
                .collect();
            export_to_file(&reports, "grades", args)?
        }
    })
}

/// Render `records` and write them atomically. Returns the confirmation line.
fn export_to_file<T: Exportable>(records: &[T], entity: &str, args: ExportArgs) -> Result<String, ClientError> {
    let format: ExportFormat = args.format.parse()?;
    let contents = export::render(records, format)?;
    let path = args.output.unwrap_or_else(|| default_export_path(entity, format));
    export::write_atomic(&path, &contents)?;
    tracing::info!(path = %path.display(), records = records.len(), "export written");
    Ok(format!("exported {} {} to {}\n", records.len(), entity, path.display()))
}

fn default_export_path(entity: &str, format: ExportFormat) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{}_{}.{}", entity, stamp, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from([
            "school-client",
            "--api-url",
            "http://127.0.0.1:9/api/v1",
            "grades",
            "create",
            "--student",
            "1",
            "--course",
            "2",
            "--score",
            "8.75",
            "--semester",
            "2024.1",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://127.0.0.1:9/api/v1");
        match cli.command {
            Command::Grades {
                action: GradeAction::Create { student, score, .. },
            } => {
                assert_eq!(student, Some(1));
                assert_eq!(score, Some(8.75));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn update_flags_are_optional() {
        let cli = Cli::try_parse_from(["school-client", "students", "update", "5", "--email", "a@b.co"]).unwrap();
        match cli.command {
            Command::Students {
                action: StudentAction::Update { id, fields },
            } => {
                assert_eq!(id, 5);
                let update: StudentUpdate = fields.into();
                assert_eq!(update.email.as_deref(), Some("a@b.co"));
                assert!(update.name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn export_rejects_unknown_format_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("grades.xml");
        let args = ExportArgs {
            format: "xml".into(),
            output: Some(target.clone()),
        };
        let none: Vec<GradeReport> = Vec::new();
        let err = export_to_file(&none, "grades", args).unwrap_err();
        assert!(matches!(err, ClientError::Export(export::ExportError::UnsupportedFormat(_))));
        assert!(!target.exists());
    }

    #[test]
    fn unwritable_target_surfaces_as_export_io() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            format: "csv".into(),
            output: Some(dir.path().join("missing").join("grades.csv")),
        };
        let none: Vec<GradeReport> = Vec::new();
        let err = export_to_file(&none, "grades", args).unwrap_err();
        assert!(matches!(err, ClientError::Export(export::ExportError::Io(_))));
    }

    #[test]
    fn default_path_names_entity_and_format() {
        let path = default_export_path("courses", ExportFormat::Json);
        let name = path.to_string_lossy().into_owned();
        assert!(name.starts_with("courses_"));
        assert!(name.ends_with(".json"));
    }
}
