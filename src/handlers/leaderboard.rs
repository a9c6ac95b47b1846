// src/handlers/leaderboard.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, state::AppState};

/// Relays the pre-ranked leaderboard rows.
///
/// Ranking happens upstream of this service; the rows are passed
/// through exactly as the source file spells them.
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entries = state.leaderboard.load().await.map_err(|e| {
        tracing::error!("Failed to load leaderboard: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(entries))
}
