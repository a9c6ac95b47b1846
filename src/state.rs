use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use uuid::Uuid;

use crate::config::Config;
use crate::models::question::Question;
use crate::session::QuizSession;
use crate::source::LeaderboardSource;

/// In-memory store of active quiz attempts, keyed by session id.
///
/// A session is owned by exactly one attempt: every handler takes the
/// lock, runs one engine transition to completion and releases, so no
/// two requests ever mutate the same `QuizSession` concurrently.
/// Sessions vanish on reset/exit and on process restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, QuizSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, QuizSession>> {
        self.inner.lock().expect("session store mutex poisoned")
    }

    /// Registers a fresh attempt and hands back its id.
    pub fn insert(&self, session: QuizSession) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().insert(id, session);
        id
    }

    /// Runs `f` against the session, if it exists.
    pub fn with<T>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> T) -> Option<T> {
        self.lock().get_mut(&id).map(f)
    }

    /// Discards the session. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }
}

#[derive(Clone)]
pub struct AppState {
    /// Question pool, loaded and validated once at startup.
    pub pool: Arc<Vec<Question>>,
    pub sessions: SessionStore,
    pub leaderboard: Arc<dyn LeaderboardSource>,
    pub config: Config,
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
