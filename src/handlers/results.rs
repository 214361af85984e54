// src/handlers/results.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::quizzes::find_owned_quiz,
    models::result::ResultRow,
    repositories::QuizRepository,
    services::reporting::{summarize, to_csv},
    utils::jwt::Teacher,
};

async fn fetch_rows(pool: &SqlitePool, quiz_id: i64) -> Result<Vec<ResultRow>, AppError> {
    let rows = sqlx::query_as::<_, ResultRow>(
        r#"
        SELECT u.full_name, u.username, r.score, r.taken_at
        FROM results r
        JOIN users u ON r.user_id = u.id
        WHERE r.quiz_id = ?
        ORDER BY r.score DESC, r.taken_at ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch results: {:?}", e);
        AppError::from(e)
    })?;

    Ok(rows)
}

/// Per-quiz results with attempt count, average and best score. Owner only.
pub async fn list_results(
    State(pool): State<SqlitePool>,
    State(repo): State<Arc<dyn QuizRepository>>,
    Teacher(teacher): Teacher,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_owned_quiz(repo.as_ref(), quiz_id, &teacher).await?;
    let rows = fetch_rows(&pool, quiz_id).await?;

    let scores: Vec<i64> = rows.iter().map(|r| r.score).collect();
    let summary = summarize(&scores);

    let results: Vec<_> = rows
        .iter()
        .map(|r| {
            json!({
                "name": r.display_name(),
                "username": r.username,
                "score": r.score,
                "taken_at": r.taken_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "quiz": quiz,
        "summary": summary,
        "results": results,
    })))
}

/// Downloads the results as `results_<quiz id>.csv`. Owner only.
pub async fn export_results(
    State(pool): State<SqlitePool>,
    State(repo): State<Arc<dyn QuizRepository>>,
    Teacher(teacher): Teacher,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_owned_quiz(repo.as_ref(), quiz_id, &teacher).await?;
    let rows = fetch_rows(&pool, quiz_id).await?;

    let body = to_csv(&rows)?;
    let disposition = format!("attachment; filename=results_{}.csv", quiz_id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
