use std::{env, path::PathBuf, sync::Arc};

use crate::store::ScoreStore;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";
pub(crate) const DEFAULT_JSON_LIMIT_BYTES: usize = 16 * 1024;
pub(crate) const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub(crate) const DEFAULT_MAX_PLAYER_NAME_CHARS: usize = 50;

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) data_dir: PathBuf,
    pub(crate) json_limit_bytes: usize,
    pub(crate) leaderboard_limit: usize,
    pub(crate) max_player_name_chars: usize,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            bind_addr: read_env_string("API_BIND_ADDR", DEFAULT_BIND_ADDR),
            data_dir: PathBuf::from(read_env_string("DATA_DIR", DEFAULT_DATA_DIR)),
            json_limit_bytes: read_env_usize("JSON_LIMIT_BYTES", DEFAULT_JSON_LIMIT_BYTES),
            leaderboard_limit: read_env_usize("LEADERBOARD_LIMIT", DEFAULT_LEADERBOARD_LIMIT),
            max_player_name_chars: read_env_usize(
                "MAX_PLAYER_NAME_CHARS",
                DEFAULT_MAX_PLAYER_NAME_CHARS,
            ),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) scores: Arc<ScoreStore>,
    pub(crate) leaderboard_limit: usize,
    pub(crate) max_player_name_chars: usize,
}

impl AppState {
    pub(crate) fn new(scores: ScoreStore, config: &ServerConfig) -> Self {
        Self {
            scores: Arc::new(scores),
            leaderboard_limit: config.leaderboard_limit,
            max_player_name_chars: config.max_player_name_chars,
        }
    }
}

pub(crate) fn read_env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
