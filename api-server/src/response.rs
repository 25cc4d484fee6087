use actix_web::{http::StatusCode, HttpResponse};

/// Error body shared by every endpoint: `{success: false, error, error_code?}`.
pub(crate) fn json_error_with_code(
    status: StatusCode,
    message: impl Into<String>,
    error_code: Option<&str>,
) -> HttpResponse {
    let mut body = serde_json::json!({
        "success": false,
        "error": message.into(),
    });
    if let Some(code) = error_code {
        body["error_code"] = serde_json::Value::String(code.to_string());
    }
    HttpResponse::build(status).json(body)
}

pub(crate) fn bad_request(message: impl Into<String>, error_code: &str) -> HttpResponse {
    json_error_with_code(StatusCode::BAD_REQUEST, message, Some(error_code))
}

pub(crate) fn storage_error() -> HttpResponse {
    json_error_with_code(
        StatusCode::INTERNAL_SERVER_ERROR,
        "score store error",
        Some("internal_error"),
    )
}
