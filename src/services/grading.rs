// src/services/grading.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::{
    error::AppError,
    models::{
        question::{Question, QuestionType},
        quiz::Quiz,
        result::NewResult,
    },
    repositories::QuizRepository,
    services::eligibility::{Denial, check_eligibility},
};

#[derive(Debug, Clone, Serialize)]
pub struct QuestionFeedback {
    pub question_id: i64,
    pub question_text: String,
    pub submitted_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeResult {
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub feedback: Vec<QuestionFeedback>,
}

/// What the student sees after submitting.
#[derive(Debug, Serialize)]
pub struct AttemptOutcome {
    pub result_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub passing_score: i64,
    pub passed: bool,
    pub feedback: Vec<QuestionFeedback>,
}

/// Free text ignores surrounding whitespace and case; choices must match exactly.
pub fn is_correct(question: &Question, submitted: &str) -> bool {
    match question.question_type {
        QuestionType::FreeText => {
            submitted.trim().to_lowercase() == question.correct_answer.to_lowercase()
        }
        QuestionType::MultipleChoice | QuestionType::TrueFalse => {
            submitted == question.correct_answer
        }
    }
}

/// `score / total` as a percentage rounded to one decimal, 0 for an empty quiz.
///
/// Exact halves round to even: 1/16 is 6.25% and reports as 6.2.
pub fn percentage(score: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_half_even(score * 1000, total) as f64 / 10.0
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
/// Both arguments must be non-negative and `denominator` non-zero.
pub(crate) fn round_half_even(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);

    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Grades every question of the quiz. Unanswered questions grade as "".
pub fn grade(questions: &[Question], answers: &HashMap<i64, String>) -> GradeResult {
    let feedback: Vec<QuestionFeedback> = questions
        .iter()
        .map(|q| {
            let submitted = answers.get(&q.id).map(String::as_str).unwrap_or("");
            QuestionFeedback {
                question_id: q.id,
                question_text: q.question_text.clone(),
                submitted_answer: submitted.to_string(),
                correct_answer: q.correct_answer.clone(),
                is_correct: is_correct(q, submitted),
            }
        })
        .collect();

    let score = feedback.iter().filter(|f| f.is_correct).count() as i64;
    let total = questions.len() as i64;

    GradeResult {
        score,
        total,
        percentage: percentage(score, total),
        feedback,
    }
}

/// Grades a submission and records exactly one result row.
///
/// `now` is the local wall-clock time used against the deadline; `taken_at`
/// is stored on the result.
pub async fn submit_attempt(
    repo: &dyn QuizRepository,
    quiz: &Quiz,
    user_id: i64,
    answers: &HashMap<i64, String>,
    now: NaiveDateTime,
    taken_at: DateTime<Utc>,
) -> Result<AttemptOutcome, AppError> {
    check_eligibility(repo, quiz, user_id, now)
        .await?
        .into_result()?;

    let questions = repo.list_questions(quiz.id).await?;
    let graded = grade(&questions, answers);

    let result = repo
        .insert_result(NewResult {
            user_id,
            quiz_id: quiz.id,
            score: graded.score,
            taken_at,
            max_attempts: quiz.max_attempts,
        })
        .await?
        .ok_or(AppError::Ineligible(Denial::AttemptsExhausted))?;

    tracing::info!(
        quiz_id = quiz.id,
        user_id,
        score = graded.score,
        total = graded.total,
        "Attempt recorded"
    );

    Ok(AttemptOutcome {
        result_id: result.id,
        quiz_id: quiz.id,
        score: graded.score,
        total: graded.total,
        percentage: graded.percentage,
        passing_score: quiz.passing_score,
        passed: graded.percentage >= quiz.passing_score as f64,
        feedback: graded.feedback,
    })
}
