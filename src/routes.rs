// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{attempts, auth, profile, questions, quizzes, results},
    state::AppState,
};

/// Headroom on top of the upload cap for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, profile, quizzes, questions).
/// * Serves uploaded images under `/uploads`.
/// * Applies global middleware (Trace, CORS, body limit).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .route("/image", post(profile::upload_profile_image))
        .route("/results", get(profile::list_my_results));

    let quiz_routes = Router::new()
        .route(
            "/{id}",
            get(quizzes::get_quiz)
                .put(quizzes::update_quiz)
                .delete(quizzes::delete_quiz),
        )
        .route(
            "/{id}/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/{id}/attempt",
            get(attempts::start_attempt).post(attempts::submit),
        )
        .route("/{id}/results", get(results::list_results))
        .route("/{id}/results.csv", get(results::export_results));

    let question_routes = Router::new()
        .route("/{id}", delete(questions::delete_question))
        .route("/{id}/image", post(questions::upload_question_image));

    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;
    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route(
            "/api/quizzes",
            get(quizzes::list_quizzes).post(quizzes::create_quiz),
        )
        .nest("/api/auth", auth_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/questions", question_routes)
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
