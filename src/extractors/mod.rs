//! Request extractors that reject with [`AppError`](crate::error::AppError) so every failure
//! uses the same error body.

mod json;
mod pagination;

pub use json::ApiJson;
pub use pagination::{PageParams, Pagination};
