mod config;
mod handlers;
mod response;
mod store;
mod types;

use std::time::{SystemTime, UNIX_EPOCH};

use actix_cors::Cors;
use actix_web::{http::Method, middleware, web, App, HttpServer};

use crate::config::{AppState, ServerConfig};
use crate::handlers::{health, list_scores, method_not_allowed, preflight, submit_score};
use crate::store::ScoreStore;

pub(crate) fn now_unix_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::resource("/api/score")
            .route(web::get().to(list_scores))
            .route(web::post().to(submit_score))
            .route(web::method(Method::OPTIONS).to(preflight))
            .default_service(web::to(method_not_allowed)),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let scores = ScoreStore::open(&config.data_dir).map_err(|e| {
        tracing::error!("failed to open score store: {e}");
        std::io::Error::other(e)
    })?;

    tracing::info!(
        "starting leaderboard api: bind_addr={} data_dir={} leaderboard_limit={} max_player_name_chars={} json_limit_bytes={}",
        config.bind_addr,
        config.data_dir.display(),
        config.leaderboard_limit,
        config.max_player_name_chars,
        config.json_limit_bytes
    );

    let state = AppState::new(scores, &config);
    let json_limit = config.json_limit_bytes;

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(json_limit))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{normalize_score, parse_submission, sanitize_player_name};
    use actix_web::{http::StatusCode, test as awtest};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            bind_addr: config::DEFAULT_BIND_ADDR.to_string(),
            data_dir: dir.path().to_path_buf(),
            json_limit_bytes: config::DEFAULT_JSON_LIMIT_BYTES,
            leaderboard_limit: config::DEFAULT_LEADERBOARD_LIMIT,
            max_player_name_chars: config::DEFAULT_MAX_PLAYER_NAME_CHARS,
        };
        let scores = ScoreStore::open(&config.data_dir).unwrap();
        (AppState::new(scores, &config), dir)
    }

    macro_rules! test_app {
        ($state:expr) => {
            awtest::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(routes),
            )
            .await
        };
    }

    #[test]
    fn sanitize_keeps_words_spaces_and_cjk() {
        assert_eq!(
            sanitize_player_name("  玩家_One <script>  ", 50).as_deref(),
            Some("玩家_One script")
        );
        assert_eq!(
            sanitize_player_name("tab\there", 50).as_deref(),
            Some("tab here")
        );
        assert_eq!(sanitize_player_name("!!!", 50), None);
        assert_eq!(sanitize_player_name("   ", 50), None);
    }

    #[test]
    fn sanitize_truncates_by_characters() {
        let long = "名".repeat(80);
        let name = sanitize_player_name(&long, 50).unwrap();
        assert_eq!(name.chars().count(), 50);
    }

    #[test]
    fn score_is_floored_and_clamped() {
        assert_eq!(normalize_score(&json!(12.9)), Some(12));
        assert_eq!(normalize_score(&json!(-5)), Some(0));
        assert_eq!(normalize_score(&json!(-0.5)), Some(0));
        assert_eq!(normalize_score(&json!(1e300)), Some(i64::MAX));
        assert_eq!(normalize_score(&json!(u64::MAX)), Some(i64::MAX));
        assert_eq!(normalize_score(&json!("100")), None);
        assert_eq!(normalize_score(&Value::Null), None);
    }

    #[test]
    fn submission_errors_carry_codes() {
        let err = parse_submission(b"{not json", 50).unwrap_err();
        assert_eq!(err.1, "invalid_json");
        let err = parse_submission(br#"[1, 2]"#, 50).unwrap_err();
        assert_eq!(err.1, "invalid_json");
        let err = parse_submission(br#"{"player_name": 7, "score": 1}"#, 50).unwrap_err();
        assert_eq!(err.1, "invalid_player_name");
        let err = parse_submission(br#"{"player_name": "a", "score": true}"#, 50).unwrap_err();
        assert_eq!(err.1, "invalid_score");
        let err = parse_submission(br#"{"player_name": "a"}"#, 50).unwrap_err();
        assert_eq!(err.1, "invalid_score");
    }

    #[actix_web::test]
    async fn empty_leaderboard_is_an_empty_array() {
        let (state, _dir) = test_state();
        let app = test_app!(state);

        let req = awtest::TestRequest::get().uri("/api/score").to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn negative_score_is_stored_as_zero() {
        let (state, _dir) = test_state();
        let app = test_app!(state);

        let req = awtest::TestRequest::post()
            .uri("/api/score")
            .set_json(json!({ "player_name": "neg", "score": -5 }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["success"], Value::Bool(true));
        assert!(body["id"].as_i64().is_some());

        let top = state.scores.top(10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].score, 0);
    }

    #[actix_web::test]
    async fn empty_name_is_rejected() {
        let (state, _dir) = test_state();
        let app = test_app!(state);

        let req = awtest::TestRequest::post()
            .uri("/api/score")
            .set_json(json!({ "player_name": "", "score": 100 }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["error_code"], json!("invalid_player_name"));
        assert_eq!(state.scores.count().unwrap(), 0);
    }

    #[actix_web::test]
    async fn malformed_body_is_a_client_error() {
        let (state, _dir) = test_state();
        let app = test_app!(state);

        let req = awtest::TestRequest::post()
            .uri("/api/score")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"player_name\":")
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["error_code"], json!("invalid_json"));
    }

    #[actix_web::test]
    async fn leaderboard_returns_top_ten_descending() {
        let (state, _dir) = test_state();
        let app = test_app!(state);

        for score in [30, 500, 10, 70, 250, 90, 5, 1000, 60, 40, 20, 80] {
            let req = awtest::TestRequest::post()
                .uri("/api/score")
                .set_json(json!({ "player_name": format!("p{score}"), "score": score }))
                .to_request();
            let resp = awtest::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = awtest::TestRequest::get().uri("/api/score").to_request();
        let body: Vec<Value> = awtest::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 10);
        let scores: Vec<i64> = body.iter().filter_map(|e| e["score"].as_i64()).collect();
        assert_eq!(scores, vec![1000, 500, 250, 90, 80, 70, 60, 40, 30, 20]);
        assert_eq!(body[0]["player_name"], json!("p1000"));
        assert!(body[0]["id"].is_i64());
    }

    #[actix_web::test]
    async fn options_and_unsupported_methods() {
        let (state, _dir) = test_state();
        let app = test_app!(state);

        let req = awtest::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/score")
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = awtest::TestRequest::delete().uri("/api/score").to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["error_code"], json!("method_not_allowed"));
    }

    #[actix_web::test]
    async fn health_reports_row_count() {
        let (state, _dir) = test_state();
        state.scores.insert("seed", 1, now_unix_s()).unwrap();
        let app = test_app!(state);

        let req = awtest::TestRequest::get().uri("/health").to_request();
        let body: Value = awtest::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["stored_scores"], json!(1));
    }
}
