use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use vaxbook_auth::AuthError;
use vaxbook_core::DomainError;

/// Gate outcomes keep a fixed mapping: 401 / 403 / 404.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    let status = match err {
        AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        AuthError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    json_error(status, err.kind(), err.to_string())
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(what) => auth_error_to_response(AuthError::NotFound(what)),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn internal_error(context: &str, err: impl core::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %err, "{context}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", context.to_string())
}
