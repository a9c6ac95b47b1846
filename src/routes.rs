// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{leaderboard, quiz};
use crate::state::AppState;

/// Assembles the main application router.
///
/// * Merges the sub-routers (quiz sessions, leaderboard).
/// * Applies global middleware (Trace, CORS for the widget dev server).
/// * Injects global state (question pool, session store, sources).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/sessions", post(quiz::start_session))
        .route(
            "/sessions/{id}",
            get(quiz::get_session).delete(quiz::reset_session),
        )
        .route("/sessions/{id}/answer", post(quiz::submit_answer))
        .route("/sessions/{id}/advance", post(quiz::advance_session))
        .route("/sessions/{id}/summary", get(quiz::session_summary));

    let leaderboard_routes = Router::new().route("/", get(leaderboard::get_leaderboard));

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest("/api/leaderboard", leaderboard_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
