//! Shared application state for all routes.

use crate::config::{DeletePolicy, Settings};
use crate::sql::Catalog;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub catalog: Arc<Catalog>,
    pub delete_policy: DeletePolicy,
    pub app_name: Arc<str>,
}

impl AppState {
    pub fn new(pool: PgPool, settings: &Settings) -> Self {
        AppState {
            pool,
            catalog: Arc::new(Catalog::new(&settings.schema)),
            delete_policy: settings.delete_policy,
            app_name: Arc::from(settings.app_name.as_str()),
        }
    }
}
