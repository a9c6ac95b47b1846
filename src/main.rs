// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use quizora::config::Config;
use quizora::routes;
use quizora::source::{FileLeaderboardSource, FileQuestionSource, QuestionSource};
use quizora::state::{AppState, SessionStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Load and validate the question pool from the static endpoint's
    // backing file. The pool is fixed for the process lifetime.
    let question_source = FileQuestionSource::new(&config.questions_file);
    let pool = question_source
        .load()
        .await
        .expect("Failed to load question pool");

    if pool.is_empty() {
        panic!(
            "No usable questions in {}; refusing to start",
            config.questions_file
        );
    }

    let leaderboard = FileLeaderboardSource::new(&config.leaderboard_file);

    // Create AppState
    let state = AppState {
        pool: Arc::new(pool),
        sessions: SessionStore::new(),
        leaderboard: Arc::new(leaderboard),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .expect("BIND_ADDR must be a valid socket address");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
