//! Router assembly.

mod common;
mod docs;
mod entity;

pub use common::common_routes;
pub use docs::{docs_routes, ApiDoc};
pub use entity::entity_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub const API_PREFIX: &str = "/api/v1";

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// The whole service: common routes, OpenAPI document and the entity API under `/api/v1`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(docs_routes())
        .nest(API_PREFIX, entity_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
