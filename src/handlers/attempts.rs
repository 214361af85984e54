// src/handlers/attempts.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{Local, Utc};

use crate::{
    error::AppError,
    handlers::quizzes::find_quiz,
    models::result::SubmitAttemptRequest,
    repositories::QuizRepository,
    services::{assembler::assemble, eligibility::check_eligibility, grading::submit_attempt},
    utils::jwt::AuthUser,
};

/// Presents a quiz for taking.
///
/// Refuses expired quizzes and users out of attempts, then returns the
/// questions in a fresh random order without answers.
pub async fn start_attempt(
    State(repo): State<Arc<dyn QuizRepository>>,
    user: AuthUser,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(repo.as_ref(), quiz_id).await?;

    check_eligibility(repo.as_ref(), &quiz, user.id, Local::now().naive_local())
        .await?
        .into_result()?;

    let questions = repo.list_questions(quiz_id).await?;
    let view = assemble(&quiz, questions, &mut rand::thread_rng());

    Ok(Json(view))
}

/// Grades a submission and records the attempt.
pub async fn submit(
    State(repo): State<Arc<dyn QuizRepository>>,
    user: AuthUser,
    Path(quiz_id): Path<i64>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(repo.as_ref(), quiz_id).await?;

    let outcome = submit_attempt(
        repo.as_ref(),
        &quiz,
        user.id,
        &req.answers,
        Local::now().naive_local(),
        Utc::now(),
    )
    .await?;

    Ok(Json(outcome))
}
