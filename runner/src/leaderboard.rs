//! Blocking client for the leaderboard service.

use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub player_name: String,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: i64,
}

pub fn score_url(base_url: &str) -> String {
    format!("{}/api/score", base_url.trim_end_matches('/'))
}

/// Posts one score and returns the stored row id.
pub fn submit_score(base_url: &str, player_name: &str, score: u32) -> Result<i64> {
    let url = score_url(base_url);
    let response = ureq::post(&url)
        .send_json(serde_json::json!({
            "player_name": player_name,
            "score": score,
        }))
        .with_context(|| format!("score submission to {url} failed"))?;
    let body: SubmitResponse = response
        .into_json()
        .context("score submission returned an unreadable body")?;
    Ok(body.id)
}

/// Submits on a background thread. Failures are logged and never reach the caller.
pub fn spawn_submit(base_url: String, player_name: String, score: u32) -> JoinHandle<()> {
    thread::spawn(move || match submit_score(&base_url, &player_name, score) {
        Ok(id) => tracing::info!(id, score, player_name = %player_name, "score submitted"),
        Err(err) => tracing::warn!(score, "score submission failed: {err:#}"),
    })
}

pub fn fetch_top(base_url: &str) -> Result<Vec<LeaderboardEntry>> {
    let url = score_url(base_url);
    let response = ureq::get(&url)
        .call()
        .with_context(|| format!("leaderboard request to {url} failed"))?;
    response
        .into_json()
        .context("leaderboard returned an unreadable body")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_url_ignores_trailing_slashes() {
        assert_eq!(score_url("http://localhost:8080"), "http://localhost:8080/api/score");
        assert_eq!(score_url("http://localhost:8080//"), "http://localhost:8080/api/score");
    }

    #[test]
    fn entries_parse_from_the_service_shape() {
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(
            r#"[{"id": 3, "player_name": "玩家", "score": 900}, {"id": 1, "player_name": "b", "score": 10}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].player_name, "玩家");
        assert_eq!(entries[1].score, 10);
    }

    #[test]
    fn unreachable_service_is_an_error_not_a_panic() {
        let handle = spawn_submit("http://127.0.0.1:9".to_string(), "nobody".to_string(), 5);
        assert!(handle.join().is_ok());
        assert!(fetch_top("http://127.0.0.1:9").is_err());
    }
}
