// src/handlers/quizzes.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{Quiz, QuizListParams, QuizListing, QuizPayload},
    repositories::{QUIZ_COLUMNS, QuizRepository},
    utils::jwt::{AuthUser, Teacher},
};

/// Loads a quiz or fails with 404.
pub(crate) async fn find_quiz(repo: &dyn QuizRepository, quiz_id: i64) -> Result<Quiz, AppError> {
    repo.find_quiz(quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
}

/// Loads a quiz the calling teacher created; other teachers get 403.
pub(crate) async fn find_owned_quiz(
    repo: &dyn QuizRepository,
    quiz_id: i64,
    teacher: &AuthUser,
) -> Result<Quiz, AppError> {
    let quiz = find_quiz(repo, quiz_id).await?;
    if quiz.creator_id != teacher.id {
        return Err(AppError::Forbidden("You do not own this quiz".to_string()));
    }
    Ok(quiz)
}

/// Dashboard listing.
///
/// Teachers see only their own quizzes, students see every quiz.
/// `q` filters by title (case-insensitive substring).
pub async fn list_quizzes(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let creator = user.is_teacher().then_some(user.id);
    let search_pattern = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q));

    let quizzes = sqlx::query_as::<_, QuizListing>(
        r#"
        SELECT
            q.id, q.title, q.creator_id, u.username AS creator_name,
            q.time_limit, q.strict_mode, q.deadline, q.passing_score, q.max_attempts
        FROM quizzes q
        JOIN users u ON q.creator_id = u.id
        WHERE (?1 IS NULL OR q.creator_id = ?1)
          AND (?2 IS NULL OR q.title LIKE ?2)
        ORDER BY q.id DESC
        "#,
    )
    .bind(creator)
    .bind(search_pattern)
    .fetch_all(&pool)
    .await?;

    Ok(Json(quizzes))
}

/// Creates a quiz owned by the calling teacher.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Teacher(teacher): Teacher,
    Json(payload): Json<QuizPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let deadline = payload.parsed_deadline()?;

    let quiz = sqlx::query_as::<_, Quiz>(&format!(
        r#"
        INSERT INTO quizzes
        (title, creator_id, time_limit, strict_mode, deadline, passing_score, max_attempts, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(payload.title.trim())
    .bind(teacher.id)
    .bind(payload.time_limit)
    .bind(payload.strict_mode)
    .bind(deadline)
    .bind(payload.passing_score)
    .bind(payload.max_attempts)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(quiz_id = quiz.id, teacher_id = teacher.id, "Quiz created");

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Retrieves quiz metadata. Open to any signed-in user.
pub async fn get_quiz(
    State(repo): State<Arc<dyn QuizRepository>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(repo.as_ref(), id).await?;
    Ok(Json(quiz))
}

/// Replaces the editable fields of a quiz. Owner only.
pub async fn update_quiz(
    State(pool): State<SqlitePool>,
    State(repo): State<Arc<dyn QuizRepository>>,
    Teacher(teacher): Teacher,
    Path(id): Path<i64>,
    Json(payload): Json<QuizPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let deadline = payload.parsed_deadline()?;
    find_owned_quiz(repo.as_ref(), id, &teacher).await?;

    let quiz = sqlx::query_as::<_, Quiz>(&format!(
        r#"
        UPDATE quizzes
        SET title = ?, time_limit = ?, strict_mode = ?, deadline = ?,
            passing_score = ?, max_attempts = ?
        WHERE id = ?
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(payload.title.trim())
    .bind(payload.time_limit)
    .bind(payload.strict_mode)
    .bind(deadline)
    .bind(payload.passing_score)
    .bind(payload.max_attempts)
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update quiz: {:?}", e);
        AppError::from(e)
    })?
    .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(quiz))
}

/// Deletes a quiz with its questions and results. Owner only.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    State(repo): State<Arc<dyn QuizRepository>>,
    Teacher(teacher): Teacher,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_owned_quiz(repo.as_ref(), id, &teacher).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM results WHERE quiz_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM questions WHERE quiz_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(quiz_id = id, teacher_id = teacher.id, "Quiz deleted");

    Ok(StatusCode::NO_CONTENT)
}
