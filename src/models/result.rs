// src/models/result.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'results' table in the database.
/// One immutable row per submitted attempt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}

/// An attempt about to be recorded.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
    /// The quiz's attempt cap at submission time, 0 = unlimited.
    pub max_attempts: i64,
}

/// A result joined with the attempting user, for the teacher's report.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResultRow {
    pub full_name: Option<String>,
    pub username: String,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}

impl ResultRow {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

/// A student's own attempt, joined with the quiz title.
#[derive(Debug, Serialize, FromRow)]
pub struct HistoryEntry {
    pub quiz_id: i64,
    pub title: String,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    /// User's answers map.
    /// Key: Question ID (i64)
    /// Value: literal option text, or the typed free-text answer
    #[serde(default)]
    pub answers: HashMap<i64, String>,
}
