//! HTTP handlers: decode the request, call one service operation, encode the result.

pub mod courses;
pub mod grades;
pub mod students;

use crate::error::AppError;

/// Entity ids are positive integers.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    match id_str.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::BadRequest(format!("invalid id: {}", id_str))),
    }
}
