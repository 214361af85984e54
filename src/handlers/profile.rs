use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::auth::USER_COLUMNS,
    models::{
        result::HistoryEntry,
        user::{MeResponse, UpdateProfileRequest, User},
    },
    utils::{
        hash::{hash_password, verify_password},
        jwt::AuthUser,
        upload::{read_image_field, remove_upload, store},
    },
};

async fn load_user(pool: &SqlitePool, id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}

/// Get current user's profile.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let me = load_user(&pool, user.id).await?;
    Ok(Json(MeResponse::from(me)))
}

/// Updates the caller's full name and, when the current password checks out,
/// their password.
///
/// A wrong current password rejects the whole request; nothing is written.
pub async fn update_me(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let me = load_user(&pool, user.id).await?;

    let new_hash = match &payload.new_password {
        Some(new_password) => {
            let current = payload.current_password.as_deref().unwrap_or("");
            if !verify_password(current, &me.password)? {
                return Err(AppError::AuthError(
                    "Incorrect current password".to_string(),
                ));
            }
            Some(hash_password(new_password)?)
        }
        None => None,
    };

    if let Some(full_name) = payload.full_name.as_deref().map(str::trim) {
        // Blank clears the name so the username shows instead.
        sqlx::query("UPDATE users SET full_name = ? WHERE id = ?")
            .bind(Some(full_name).filter(|n| !n.is_empty()))
            .bind(user.id)
            .execute(&pool)
            .await?;
    }

    if let Some(hash) = new_hash {
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(hash)
            .bind(user.id)
            .execute(&pool)
            .await?;
        tracing::info!(user_id = user.id, "Password changed");
    }

    let me = load_user(&pool, user.id).await?;
    Ok(Json(MeResponse::from(me)))
}

/// Replaces the caller's profile picture (multipart field `profile_image`).
pub async fn upload_profile_image(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = read_image_field(&mut multipart, "profile_image", config.max_upload_bytes).await?;
    let previous = load_user(&pool, user.id).await?.profile_image;

    let stored = store(
        &config.upload_dir,
        &format!("user_{}_{}", user.id, upload.filename),
        &upload.bytes,
    )
    .await?;

    sqlx::query("UPDATE users SET profile_image = ? WHERE id = ?")
        .bind(&stored)
        .bind(user.id)
        .execute(&pool)
        .await?;

    // Re-uploading the same filename overwrote the old file in place.
    if let Some(old) = previous.filter(|old| *old != stored) {
        remove_upload(&config.upload_dir, &old).await;
    }

    let me = load_user(&pool, user.id).await?;
    Ok(Json(MeResponse::from(me)))
}

/// Lists the caller's own attempts, newest first.
pub async fn list_my_results(
    State(pool): State<SqlitePool>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let history = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT r.quiz_id, q.title, r.score, r.taken_at
        FROM results r
        JOIN quizzes q ON r.quiz_id = q.id
        WHERE r.user_id = ?
        ORDER BY r.taken_at DESC, r.id DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(history))
}
