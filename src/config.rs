// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Backing file of the `questions.json` endpoint.
    pub questions_file: String,

    /// Backing file of the `leaderboard.json` endpoint.
    pub leaderboard_file: String,

    pub bind_addr: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let questions_file =
            env::var("QUESTIONS_FILE").unwrap_or_else(|_| "public/questions.json".to_string());

        let leaderboard_file =
            env::var("LEADERBOARD_FILE").unwrap_or_else(|_| "public/leaderboard.json".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            questions_file,
            leaderboard_file,
            bind_addr,
            rust_log,
        }
    }
}
