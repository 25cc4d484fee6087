use serde::{Deserialize, Serialize};

/// One leaderboard row as returned by `GET /api/score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ScoreEntry {
    pub(crate) id: i64,
    pub(crate) player_name: String,
    pub(crate) score: i64,
}

/// A submission that passed validation and is ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewScore {
    pub(crate) player_name: String,
    pub(crate) score: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreCreatedResponse {
    pub(crate) success: bool,
    pub(crate) message: &'static str,
    pub(crate) id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) stored_scores: u64,
    pub(crate) leaderboard_limit: usize,
    pub(crate) max_player_name_chars: usize,
}
