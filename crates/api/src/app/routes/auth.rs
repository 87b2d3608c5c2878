use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use vaxbook_auth::password::verify_password;
use vaxbook_auth::{Account, AccountStore, AuthError, JwtClaims, JwtIssuer, NewAccount, Role};

use crate::app::extract::ApiJson;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;
use crate::middleware::TOKEN_COOKIE;

pub fn router(services: &AppServices) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", authz::guarded(services, authz::authenticated(), get(me)))
        .route("/logout", get(logout))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    ApiJson(body): ApiJson<NewAccount>,
) -> axum::response::Response {
    // Self-registration never grants an elevated role. Hashing is CPU-bound.
    let hashed = tokio::task::spawn_blocking(move || body.into_account(Role::User, Utc::now())).await;
    let account = match hashed {
        Ok(Ok(a)) => a,
        Ok(Err(e)) => return errors::domain_error_to_response(e),
        Err(e) => return errors::internal_error("password hashing failed", e),
    };
    if let Err(e) = services.accounts.insert(account.clone()).await {
        return errors::domain_error_to_response(e);
    }

    tracing::info!(principal_id = %account.id, "account registered");
    session_response(&services, jar, &account, StatusCode::CREATED)
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    ApiJson(body): ApiJson<dto::LoginRequest>,
) -> axum::response::Response {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "please provide an email and password",
        );
    }

    // Same answer for unknown email and wrong password.
    let Some(account) = services.accounts.find_by_email(&body.email).await else {
        return errors::auth_error_to_response(AuthError::unauthenticated("invalid credentials"));
    };
    let stored_hash = account.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&body.password, &stored_hash)).await;
    match verified {
        Ok(true) => {}
        Ok(false) => return errors::auth_error_to_response(AuthError::unauthenticated("invalid credentials")),
        Err(e) => return errors::internal_error("password verification failed", e),
    }

    tracing::info!(principal_id = %account.id, "login succeeded");
    session_response(&services, jar, &account, StatusCode::OK)
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.accounts.get(principal.principal_id()).await {
        Some(account) => dto::ok(StatusCode::OK, account),
        None => errors::auth_error_to_response(AuthError::unauthenticated("principal no longer exists")),
    }
}

/// Overwrite the session cookie with an already-expired blank one. Always
/// emitted, whether or not the request carried the cookie.
pub async fn logout(jar: CookieJar) -> axum::response::Response {
    let cleared = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO);
    (jar.add(cleared), dto::empty()).into_response()
}

/// Issue a token for `account`, set it as the session cookie, and echo it in
/// the body for clients that prefer the header.
fn session_response(
    services: &AppServices,
    jar: CookieJar,
    account: &Account,
    status: StatusCode,
) -> axum::response::Response {
    let claims = JwtClaims::new(account.id, account.role, Utc::now(), services.session.token_ttl);
    let token = match services.tokens.issue(&claims) {
        Ok(t) => t,
        Err(e) => return errors::internal_error("failed to issue token", e),
    };

    let max_age = time::Duration::seconds(services.session.cookie_ttl.num_seconds());
    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(services.session.secure_cookies)
        .max_age(max_age);

    (
        status,
        jar.add(cookie),
        Json(serde_json::json!({ "success": true, "token": token })),
    )
        .into_response()
}
