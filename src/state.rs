use std::sync::Arc;

use crate::config::Config;
use crate::repositories::{QuizRepository, SqlxQuizRepository};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub repo: Arc<dyn QuizRepository>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let repo = Arc::new(SqlxQuizRepository::new(pool.clone()));
        Self { pool, config, repo }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuizRepository> {
    fn from_ref(state: &AppState) -> Self {
        state.repo.clone()
    }
}
