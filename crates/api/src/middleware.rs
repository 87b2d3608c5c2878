use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use vaxbook_auth::{AccessGate, CheckPipeline};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Name of the session cookie carrying the JWT.
pub const TOKEN_COOKIE: &str = "token";

/// Per-route gate configuration: the shared gate plus this route's checks.
#[derive(Clone, Debug)]
pub struct GuardState {
    pub gate: AccessGate,
    pub checks: CheckPipeline,
}

/// Resolve the caller and run the route's checks; either attach the
/// principal and proceed, or reject with the mapped status.
pub async fn guard(State(state): State<GuardState>, mut req: Request, next: Next) -> Response {
    let credential = extract_credential(req.headers());

    match state
        .gate
        .admit(credential.as_deref(), &state.checks, Utc::now())
        .await
    {
        Ok(principal) => {
            req.extensions_mut().insert(PrincipalContext::new(principal));
            next.run(req).await
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// `Authorization: Bearer` wins; the session cookie is the fallback.
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    extract_bearer(headers).or_else(|| {
        CookieJar::from_headers(headers)
            .get(TOKEN_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
