// src/handlers/questions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{SqlitePool, types::Json as SqlJson};

use crate::{
    config::Config,
    error::AppError,
    handlers::quizzes::find_owned_quiz,
    models::question::{CreateQuestionRequest, Question},
    repositories::{QUESTION_COLUMNS, QuizRepository},
    utils::{
        jwt::{AuthUser, Teacher},
        upload::{read_image_field, store},
    },
};

/// Loads a question whose quiz belongs to the calling teacher.
async fn find_owned_question(
    pool: &SqlitePool,
    repo: &dyn QuizRepository,
    question_id: i64,
    teacher: &AuthUser,
) -> Result<Question, AppError> {
    let question = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?"
    ))
    .bind(question_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    find_owned_quiz(repo, question.quiz_id, teacher).await?;
    Ok(question)
}

/// Lists a quiz's questions including answers. Owner only.
pub async fn list_questions(
    State(repo): State<Arc<dyn QuizRepository>>,
    Teacher(teacher): Teacher,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_owned_quiz(repo.as_ref(), quiz_id, &teacher).await?;
    let questions = repo.list_questions(quiz_id).await?;
    Ok(Json(questions))
}

/// Adds a question to a quiz. Owner only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    State(repo): State<Arc<dyn QuizRepository>>,
    Teacher(teacher): Teacher,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    find_owned_quiz(repo.as_ref(), quiz_id, &teacher).await?;
    let new_question = payload.into_new_question()?;

    let question = sqlx::query_as::<_, Question>(&format!(
        r#"
        INSERT INTO questions
        (quiz_id, question_type, question_text, options, correct_answer)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {QUESTION_COLUMNS}
        "#
    ))
    .bind(quiz_id)
    .bind(new_question.question_type)
    .bind(&new_question.question_text)
    .bind(SqlJson(&new_question.options))
    .bind(&new_question.correct_answer)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Deletes a single question. Owner of the parent quiz only.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    State(repo): State<Arc<dyn QuizRepository>>,
    Teacher(teacher): Teacher,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_owned_question(&pool, repo.as_ref(), id, &teacher).await?;

    sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::from(e)
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Attaches an image to a question (multipart field `question_image`).
pub async fn upload_question_image(
    State(pool): State<SqlitePool>,
    State(repo): State<Arc<dyn QuizRepository>>,
    State(config): State<Config>,
    Teacher(teacher): Teacher,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let question = find_owned_question(&pool, repo.as_ref(), id, &teacher).await?;
    let upload =
        read_image_field(&mut multipart, "question_image", config.max_upload_bytes).await?;

    let stored = store(
        &config.upload_dir,
        &format!(
            "q_{}_{}_{}",
            question.quiz_id,
            chrono::Utc::now().timestamp_millis(),
            upload.filename
        ),
        &upload.bytes,
    )
    .await?;

    let question = sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET image_path = ? WHERE id = ? RETURNING {QUESTION_COLUMNS}"
    ))
    .bind(&stored)
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(question))
}
