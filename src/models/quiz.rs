// src/models/quiz.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

/// Accepted deadline layouts. Both sort lexicographically in the same order as in time.
const DEADLINE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub creator_id: i64,

    /// Minutes, 0 = unlimited. Advisory only; the server does not enforce it.
    pub time_limit: i64,

    /// Stored for clients; no server-side behavior is attached to it.
    pub strict_mode: bool,

    /// Local wall-clock time after which attempts are refused.
    pub deadline: Option<NaiveDateTime>,

    /// Minimum percentage to pass.
    pub passing_score: i64,

    /// 0 = unlimited.
    pub max_attempts: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A quiz row joined with its creator's username, for listings.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizListing {
    pub id: i64,
    pub title: String,
    pub creator_id: i64,
    pub creator_name: String,
    pub time_limit: i64,
    pub strict_mode: bool,
    pub deadline: Option<NaiveDateTime>,
    pub passing_score: i64,
    pub max_attempts: i64,
}

/// Query parameters for the quiz dashboard.
#[derive(Debug, Deserialize)]
pub struct QuizListParams {
    pub q: Option<String>,
}

/// DTO for creating or editing a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct QuizPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_limit: i64,
    #[serde(default)]
    pub strict_mode: bool,
    pub deadline: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub passing_score: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub max_attempts: i64,
}

impl QuizPayload {
    /// Parses the optional deadline; a blank string means "no deadline".
    pub fn parsed_deadline(&self) -> Result<Option<NaiveDateTime>, AppError> {
        match self.deadline.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_deadline(raw).map(Some),
        }
    }
}

pub fn parse_deadline(raw: &str) -> Result<NaiveDateTime, AppError> {
    DEADLINE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid deadline '{}', expected YYYY-MM-DDTHH:MM",
                raw
            ))
        })
}
