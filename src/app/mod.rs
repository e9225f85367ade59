use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

/// Human-readable application name.
pub const APP_NAME: &str = "Staffdesk";

/// Shared state available to all handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub storage: Arc<dyn storage::ObjectStorage>,
    pub config: config::Config,
}

/// All application routes. Merged into the full router in lib.rs.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(features::auth::routes())
        .merge(features::preferences::routes())
        .merge(features::companies::routes())
        .merge(features::employees::routes())
        .merge(features::departments::routes())
        .merge(features::job_positions::routes())
        .merge(features::invites::routes())
}

pub mod authz;
pub mod config;
pub mod db;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod features;
pub mod session;
pub mod storage;
pub mod tenant;
