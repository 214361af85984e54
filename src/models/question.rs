// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::{error::AppError, utils::html::clean_html};

pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];
pub const MAX_CHOICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FreeText,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub question_type: QuestionType,

    /// Sanitized HTML fragment. Plain `<`, `>` and `&` are stored
    /// entity-encoded; clients render this as markup.
    pub question_text: String,

    /// Filename inside the uploads directory.
    pub image_path: Option<String>,

    /// Answer options, stored as a JSON array.
    /// Empty for free text, `["True", "False"]` for true/false.
    pub options: Json<Vec<String>>,

    /// Literal text of the correct option, or the expected free-text answer.
    pub correct_answer: String,
}

/// DTO for creating a new question.
///
/// `options` is only read for multiple choice; `correct_answer` must be the
/// literal text of one of them.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub question_type: QuestionType,
    #[validate(length(min = 1, max = 1000))]
    pub question_text: String,
    #[serde(default)]
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

/// A validated question ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question_type: QuestionType,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl CreateQuestionRequest {
    /// Normalizes the submission per question type.
    ///
    /// A multiple-choice answer that names none of the options is rejected
    /// instead of falling back to the first option.
    pub fn into_new_question(self) -> Result<NewQuestion, AppError> {
        self.validate()?;

        let question_text = clean_html(self.question_text.trim());
        if question_text.is_empty() {
            return Err(AppError::BadRequest("Question text cannot be empty".to_string()));
        }
        let answer = self.correct_answer.trim();

        let (options, correct_answer) = match self.question_type {
            QuestionType::MultipleChoice => {
                let options: Vec<String> = self
                    .options
                    .iter()
                    .map(|o| o.trim())
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect();

                if options.is_empty() || options.len() > MAX_CHOICES {
                    return Err(AppError::BadRequest(format!(
                        "Multiple choice questions need between 1 and {} options",
                        MAX_CHOICES
                    )));
                }
                if !options.iter().any(|o| o == answer) {
                    return Err(AppError::BadRequest(
                        "Correct answer must match one of the options".to_string(),
                    ));
                }
                (options, answer.to_string())
            }
            QuestionType::TrueFalse => {
                let canonical = TRUE_FALSE_OPTIONS
                    .iter()
                    .find(|o| o.eq_ignore_ascii_case(answer))
                    .ok_or_else(|| {
                        AppError::BadRequest(
                            "True/false answer must be 'True' or 'False'".to_string(),
                        )
                    })?;
                (
                    TRUE_FALSE_OPTIONS.iter().map(|o| o.to_string()).collect(),
                    canonical.to_string(),
                )
            }
            QuestionType::FreeText => {
                if answer.is_empty() {
                    return Err(AppError::BadRequest(
                        "Free text questions need an expected answer".to_string(),
                    ));
                }
                (Vec::new(), answer.to_string())
            }
        };

        Ok(NewQuestion {
            question_type: self.question_type,
            question_text,
            options,
            correct_answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question_type: QuestionType, options: &[&str], answer: &str) -> CreateQuestionRequest {
        CreateQuestionRequest {
            question_type,
            question_text: "What is the capital of France?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: answer.to_string(),
        }
    }

    #[test]
    fn multiple_choice_drops_blank_options() {
        let q = request(QuestionType::MultipleChoice, &["Paris", " ", "London ", ""], "Paris")
            .into_new_question()
            .unwrap();
        assert_eq!(q.options, vec!["Paris", "London"]);
        assert_eq!(q.correct_answer, "Paris");
    }

    #[test]
    fn multiple_choice_answer_must_be_an_option() {
        let err = request(QuestionType::MultipleChoice, &["Paris", "London"], "Rome")
            .into_new_question()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn multiple_choice_rejects_more_than_four_options() {
        let err = request(QuestionType::MultipleChoice, &["A", "B", "C", "D", "E"], "A")
            .into_new_question()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn true_false_uses_canonical_options() {
        let q = request(QuestionType::TrueFalse, &["yes", "no"], "true")
            .into_new_question()
            .unwrap();
        assert_eq!(q.options, vec!["True", "False"]);
        assert_eq!(q.correct_answer, "True");
    }

    #[test]
    fn true_false_rejects_other_answers() {
        assert!(request(QuestionType::TrueFalse, &[], "maybe").into_new_question().is_err());
    }

    #[test]
    fn free_text_has_no_options() {
        let q = request(QuestionType::FreeText, &["ignored"], " Blue ")
            .into_new_question()
            .unwrap();
        assert!(q.options.is_empty());
        assert_eq!(q.correct_answer, "Blue");
    }

    #[test]
    fn blank_answer_is_rejected() {
        assert!(request(QuestionType::FreeText, &[], "   ").into_new_question().is_err());
    }

    #[test]
    fn script_tags_are_stripped_from_text() {
        let mut req = request(QuestionType::FreeText, &[], "Blue");
        req.question_text = "Sky colour?<script>alert(1)</script>".to_string();
        let q = req.into_new_question().unwrap();
        assert_eq!(q.question_text, "Sky colour?");
    }

    #[test]
    fn text_is_stored_as_escaped_html() {
        let mut req = request(QuestionType::FreeText, &[], "yes");
        req.question_text = "Is 3 < 5 & 5 > 2? <b>Think</b>".to_string();
        let q = req.into_new_question().unwrap();
        assert_eq!(q.question_text, "Is 3 &lt; 5 &amp; 5 &gt; 2? <b>Think</b>");
    }
}
