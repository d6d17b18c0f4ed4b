//! School registry: REST backend for students, courses and grades on PostgreSQL.

pub mod config;
pub mod error;
pub mod export;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod repo;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{DeletePolicy, Settings};
pub use error::{AppError, ConfigError, ErrorBody, FieldError};
pub use export::{render, ExportError, ExportFormat, Exportable};
pub use migration::apply_migrations;
pub use routes::{build_router, ApiDoc};
pub use service::{CourseService, GradeService, StudentService};
pub use sql::Catalog;
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
