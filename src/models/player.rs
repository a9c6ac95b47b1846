// src/models/player.rs

use serde::{Deserialize, Serialize};

/// One row of the `leaderboard.json` endpoint.
///
/// Field spellings follow the upstream file (`_id`, `image`). Ranks are
/// pre-assigned by whatever produces the file; this service only relays
/// them and never recomputes the ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub score: i64,
    pub rank: u32,
}
