// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::question::PublicQuestion,
    session::{Phase, QuizSession, SessionError},
    state::AppState,
};

/// Opens a new quiz attempt.
///
/// * Samples a quiz set from the loaded pool (up to 5 per question kind).
/// * Registers the session and returns its id plus the first question.
/// * Fails with 400 if the pool yields no questions at all.
pub async fn start_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = QuizSession::new(&state.pool, &mut rand::thread_rng())?;
    let total_questions = session.total_questions();
    let question = session
        .current_question()
        .map(PublicQuestion::from)
        .ok_or_else(|| {
            AppError::InternalServerError("fresh session has no current question".to_string())
        })?;

    let id = state.sessions.insert(session);
    tracing::info!(
        "Started quiz session {} with {} questions",
        id,
        total_questions
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "session_id": id,
            "total_questions": total_questions,
            "question": question,
        })),
    ))
}

/// Returns the current view of a session: phase, progress, the current
/// question while the attempt is running, and answer feedback while the
/// shell is showing it.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .sessions
        .with(id, |session| session_view(session))
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    Ok(Json(view))
}

/// DTO for submitting an answer to the current question.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// The chosen option, or the typed fill-in text.
    pub answer: String,
}

/// Grades the submitted answer for the current question.
///
/// * Valid only while the session awaits an answer; submitting twice
///   without advancing is rejected with 409, which is what prevents
///   double-scoring.
/// * Returns the grading outcome together with the reference answer so
///   the shell can mark the wrong choice against the right one.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .sessions
        .with(id, |session| {
            let record = session.submit_answer(&req.answer)?.clone();
            // Until `advance`, the current question is still the one
            // just answered.
            let correct_answer = session.current_question().map(|q| q.answer.clone());
            Ok::<_, SessionError>(json!({
                "is_correct": record.is_correct,
                "points_awarded": record.points_awarded,
                "correct_answer": correct_answer,
                "total_score": session.total_score(),
            }))
        })
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))??;

    Ok(Json(outcome))
}

/// Leaves the feedback stage: moves to the next question, or completes
/// the attempt if the answered question was the last one.
pub async fn advance_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .sessions
        .with(id, |session| {
            session.advance()?;
            Ok::<_, SessionError>(session_view(session))
        })
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))??;

    Ok(Json(view))
}

/// Returns the completion summary: totals, per-question records and the
/// feedback tier. 409 while the attempt is still running.
pub async fn session_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state
        .sessions
        .with(id, |session| session.summary())
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))??;

    Ok(Json(summary))
}

/// Discards a session (the "Exit Quiz" / "Try Again" intents). A new
/// attempt starts over with a freshly sampled quiz set. Idempotent.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if state.sessions.remove(id) {
        tracing::info!("Discarded quiz session {}", id);
    }
    Ok(StatusCode::NO_CONTENT)
}

fn session_view(session: &QuizSession) -> Value {
    json!({
        "phase": session.phase(),
        "current": session.current_index() + 1,
        "total": session.total_questions(),
        "total_score": session.total_score(),
        "question": session.current_question().map(PublicQuestion::from),
        "feedback": feedback_view(session),
    })
}

/// Present only while the session awaits an advance, mirroring the
/// feedback card the shell renders between questions.
fn feedback_view(session: &QuizSession) -> Option<Value> {
    if session.phase() != Phase::AwaitingAdvance {
        return None;
    }
    let record = session.answers().last()?;
    let correct_answer = &session.current_question()?.answer;
    Some(json!({
        "submitted_answer": record.submitted_answer,
        "is_correct": record.is_correct,
        "points_awarded": record.points_awarded,
        "correct_answer": correct_answer,
    }))
}
