//! Builders for unit tests.

use sqlx::types::Json;

use crate::models::{
    question::{Question, QuestionType},
    quiz::Quiz,
};

pub(crate) fn quiz(id: i64) -> Quiz {
    Quiz {
        id,
        title: format!("Quiz {id}"),
        creator_id: 1,
        time_limit: 0,
        strict_mode: false,
        deadline: None,
        passing_score: 50,
        max_attempts: 0,
        created_at: chrono::Utc::now(),
    }
}

pub(crate) fn question(
    id: i64,
    quiz_id: i64,
    question_type: QuestionType,
    options: &[&str],
    correct_answer: &str,
) -> Question {
    Question {
        id,
        quiz_id,
        question_type,
        question_text: format!("Question {id}"),
        image_path: None,
        options: Json(options.iter().map(|o| o.to_string()).collect()),
        correct_answer: correct_answer.to_string(),
    }
}

/// The three-question quiz used across the grading scenarios:
/// a capital (multiple choice), a fact (true/false) and a colour (free text).
pub(crate) fn capitals_questions(quiz_id: i64) -> Vec<Question> {
    vec![
        question(
            1,
            quiz_id,
            QuestionType::MultipleChoice,
            &["London", "Paris", "Rome", "Berlin"],
            "Paris",
        ),
        question(2, quiz_id, QuestionType::TrueFalse, &["True", "False"], "True"),
        question(3, quiz_id, QuestionType::FreeText, &[], "Blue"),
    ]
}
