//! In-memory `QuizRepository` for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::QuizRepository;
use crate::{
    error::AppError,
    models::{
        question::Question,
        quiz::Quiz,
        result::{NewResult, QuizResult},
    },
};

#[derive(Default)]
pub struct MemoryRepository {
    pub quizzes: Vec<Quiz>,
    pub questions: Vec<Question>,
    pub results: Mutex<Vec<QuizResult>>,
}

impl MemoryRepository {
    pub fn with_quiz(quiz: Quiz, questions: Vec<Question>) -> Self {
        Self {
            quizzes: vec![quiz],
            questions,
            results: Mutex::new(Vec::new()),
        }
    }

    pub fn results(&self) -> Vec<QuizResult> {
        self.results.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizRepository for MemoryRepository {
    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, AppError> {
        Ok(self.quizzes.iter().find(|q| q.id == quiz_id).cloned())
    }

    async fn list_questions(&self, quiz_id: i64) -> Result<Vec<Question>, AppError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn count_results_for(&self, user_id: i64, quiz_id: i64) -> Result<i64, AppError> {
        let results = self.results.lock().unwrap();
        Ok(results
            .iter()
            .filter(|r| r.user_id == user_id && r.quiz_id == quiz_id)
            .count() as i64)
    }

    async fn insert_result(&self, result: NewResult) -> Result<Option<QuizResult>, AppError> {
        let mut results = self.results.lock().unwrap();
        let used = results
            .iter()
            .filter(|r| r.user_id == result.user_id && r.quiz_id == result.quiz_id)
            .count() as i64;
        if result.max_attempts > 0 && used >= result.max_attempts {
            return Ok(None);
        }

        let row = QuizResult {
            id: results.len() as i64 + 1,
            user_id: result.user_id,
            quiz_id: result.quiz_id,
            score: result.score,
            taken_at: result.taken_at,
        };
        results.push(row.clone());
        Ok(Some(row))
    }
}
