//! Runtime settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use std::str::FromStr;

/// What happens to grades when the student or course they reference is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Dependent grades are deleted in the same transaction.
    #[default]
    Cascade,
    /// Deletion is refused while dependent grades exist.
    Restrict,
}

impl FromStr for DeletePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cascade" => Ok(DeletePolicy::Cascade),
            "restrict" | "block" => Ok(DeletePolicy::Restrict),
            _ => Err(ConfigError::Invalid {
                key: "DELETE_POLICY",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// Schema holding the students, courses and grades tables.
    pub schema: String,
    pub delete_policy: DeletePolicy,
    pub create_database: bool,
    pub app_name: String,
}

impl Settings {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8000";
    pub const DEFAULT_SCHEMA: &'static str = "school";
    pub const DEFAULT_APP_NAME: &'static str = "School Registry";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.into());
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DB_MAX_CONNECTIONS",
                        value: v,
                    })
                }
            },
            None => 5,
        };
        let schema = lookup("SCHOOL_SCHEMA").unwrap_or_else(|| Self::DEFAULT_SCHEMA.into());
        if !is_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "SCHOOL_SCHEMA",
                value: schema,
            });
        }
        let delete_policy = match lookup("DELETE_POLICY") {
            Some(v) => v.parse()?,
            None => DeletePolicy::default(),
        };
        let create_database = match lookup("DB_CREATE_IF_MISSING") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                key: "DB_CREATE_IF_MISSING",
                value: v,
            })?,
            None => true,
        };
        let app_name = lookup("APP_NAME").unwrap_or_else(|| Self::DEFAULT_APP_NAME.into());

        Ok(Settings {
            database_url,
            bind_addr,
            max_connections,
            schema,
            delete_policy,
            create_database,
            app_name,
        })
    }
}

/// Lowercase PostgreSQL identifier: letter or underscore, then letters, digits, underscores.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
