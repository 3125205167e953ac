use mongodb::Database;

use crate::applications::storage::ResumeStore;
use crate::config::Config;
use crate::mailer::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub mailer: Mailer,
    pub resumes: ResumeStore,
    pub config: Config,
}
