// src/repositories/mod.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        question::Question,
        quiz::Quiz,
        result::{NewResult, QuizResult},
    },
};

#[cfg(test)]
pub mod memory;

pub(crate) const QUIZ_COLUMNS: &str = "\
    id, title, creator_id, time_limit, strict_mode, deadline, \
    passing_score, max_attempts, created_at";

pub(crate) const QUESTION_COLUMNS: &str = "\
    id, quiz_id, question_type, question_text, image_path, options, correct_answer";

/// Storage capabilities needed by the attempt flow (eligibility and grading).
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, AppError>;

    /// Questions of a quiz in insertion order.
    async fn list_questions(&self, quiz_id: i64) -> Result<Vec<Question>, AppError>;

    /// Number of attempts `user_id` has already recorded for `quiz_id`.
    async fn count_results_for(&self, user_id: i64, quiz_id: i64) -> Result<i64, AppError>;

    /// Records one attempt.
    ///
    /// Returns `None` without writing when the user already holds
    /// `max_attempts` results for the quiz. The count and the insert happen
    /// atomically, so concurrent submissions cannot overshoot the cap.
    async fn insert_result(&self, result: NewResult) -> Result<Option<QuizResult>, AppError>;
}

/// `QuizRepository` over the application's SQLite pool.
#[derive(Clone)]
pub struct SqlxQuizRepository {
    pool: SqlitePool,
}

impl SqlxQuizRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizRepository for SqlxQuizRepository {
    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = ?"
        ))
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn list_questions(&self, quiz_id: i64) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = ? ORDER BY id"
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn count_results_for(&self, user_id: i64, quiz_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM results WHERE user_id = ? AND quiz_id = ?",
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_result(&self, result: NewResult) -> Result<Option<QuizResult>, AppError> {
        // Single statement: SQLite serializes writers, so the count it sees
        // is the one the row is inserted against.
        let inserted = sqlx::query_as::<_, QuizResult>(
            r#"
            INSERT INTO results (user_id, quiz_id, score, taken_at)
            SELECT ?1, ?2, ?3, ?4
            WHERE ?5 = 0
               OR (SELECT COUNT(*) FROM results WHERE user_id = ?1 AND quiz_id = ?2) < ?5
            RETURNING id, user_id, quiz_id, score, taken_at
            "#,
        )
        .bind(result.user_id)
        .bind(result.quiz_id)
        .bind(result.score)
        .bind(result.taken_at)
        .bind(result.max_attempts)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert result: {:?}", e);
            AppError::from(e)
        })?;

        Ok(inserted)
    }
}
