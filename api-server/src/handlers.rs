use actix_web::{
    http::StatusCode,
    web::{Bytes, Data},
    HttpResponse, Responder,
};
use serde_json::Value;

use crate::config::AppState;
use crate::response::{bad_request, json_error_with_code, storage_error};
use crate::types::{HealthResponse, NewScore, ScoreCreatedResponse};
use crate::now_unix_s;

fn is_cjk(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'   // unified ideographs
            | '\u{3400}'..='\u{4DBF}' // extension A
            | '\u{F900}'..='\u{FAFF}' // compatibility ideographs
            | '\u{3040}'..='\u{30FF}' // kana
            | '\u{AC00}'..='\u{D7AF}' // hangul syllables
    )
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ' ' || is_cjk(c)
}

/// Keeps word characters, spaces and CJK, trims, then truncates to `max_chars`.
/// Other whitespace collapses to a single space.
pub(crate) fn sanitize_player_name(raw: &str, max_chars: usize) -> Option<String> {
    let kept: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| is_name_char(*c))
        .collect();
    let truncated: String = kept.trim().chars().take(max_chars).collect();
    let name = truncated.trim_end().to_string();
    (!name.is_empty()).then_some(name)
}

/// Floors and clamps a JSON number into the storable range. Anything that is not
/// a finite number is rejected.
pub(crate) fn normalize_score(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int.max(0));
    }
    if value.is_u64() {
        return Some(i64::MAX);
    }
    let float = value.as_f64()?;
    if !float.is_finite() {
        return None;
    }
    // `as` saturates at i64::MAX.
    Some(float.floor().max(0.0) as i64)
}

/// Returns `(error_message, error_code)` on failure.
pub(crate) fn parse_submission(
    body: &[u8],
    max_name_chars: usize,
) -> Result<NewScore, (String, &'static str)> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| (format!("invalid JSON body: {err}"), "invalid_json"))?;
    let object = value
        .as_object()
        .ok_or_else(|| ("request body must be a JSON object".to_string(), "invalid_json"))?;

    let raw_name = object
        .get("player_name")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            (
                "player_name must be a non-empty string".to_string(),
                "invalid_player_name",
            )
        })?;
    let player_name = sanitize_player_name(raw_name, max_name_chars).ok_or_else(|| {
        (
            "player_name is empty after removing unsupported characters".to_string(),
            "invalid_player_name",
        )
    })?;

    let score = object
        .get("score")
        .and_then(normalize_score)
        .ok_or_else(|| ("score must be a number".to_string(), "invalid_score"))?;

    Ok(NewScore { player_name, score })
}

pub(crate) async fn health(state: Data<AppState>) -> impl Responder {
    let stored_scores = match state.scores.count() {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("health check failed: {e}");
            return storage_error();
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "leaderboard-api",
        stored_scores,
        leaderboard_limit: state.leaderboard_limit,
        max_player_name_chars: state.max_player_name_chars,
    })
}

pub(crate) async fn list_scores(state: Data<AppState>) -> impl Responder {
    let scores = state.scores.clone();
    let limit = state.leaderboard_limit;
    match tokio::task::spawn_blocking(move || scores.top(limit)).await {
        Ok(Ok(entries)) => HttpResponse::Ok().json(entries),
        Ok(Err(e)) => {
            tracing::error!("list_scores failed: {e}");
            storage_error()
        }
        Err(e) => {
            tracing::error!("list_scores worker failure: {e}");
            storage_error()
        }
    }
}

pub(crate) async fn submit_score(state: Data<AppState>, body: Bytes) -> impl Responder {
    let submission = match parse_submission(&body, state.max_player_name_chars) {
        Ok(submission) => submission,
        Err((msg, code)) => {
            tracing::debug!(code, "rejected score submission: {msg}");
            return bad_request(msg, code);
        }
    };

    let scores = state.scores.clone();
    let NewScore { player_name, score } = submission;
    let stored_name = player_name.clone();
    let inserted = tokio::task::spawn_blocking(move || {
        scores.insert(&stored_name, score, now_unix_s())
    })
    .await;

    match inserted {
        Ok(Ok(id)) => {
            tracing::info!(id, player_name = %player_name, score, "score saved");
            HttpResponse::Created().json(ScoreCreatedResponse {
                success: true,
                message: "score saved",
                id,
            })
        }
        Ok(Err(e)) => {
            tracing::error!(player_name = %player_name, score, "submit_score failed: {e}");
            storage_error()
        }
        Err(e) => {
            tracing::error!("submit_score worker failure: {e}");
            storage_error()
        }
    }
}

/// Answers bare `OPTIONS` requests; real CORS preflights are handled by the middleware.
pub(crate) async fn preflight() -> impl Responder {
    HttpResponse::Ok().finish()
}

pub(crate) async fn method_not_allowed() -> impl Responder {
    json_error_with_code(
        StatusCode::METHOD_NOT_ALLOWED,
        "method not allowed",
        Some("method_not_allowed"),
    )
}
