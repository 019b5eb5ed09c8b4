// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication and role-gate middleware.

use crate::error::AppError;
use crate::models::{Identity, Role};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie carrying the session token for browser clients.
pub const TOKEN_COOKIE: &str = "commandpost_token";

/// Authenticated identity resolved from the request token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
}

/// Pull the token from the cookie, falling back to `Authorization: Bearer`.
///
/// A non-empty cookie always wins, even when it holds a stale token; the
/// header is then never consulted. API clients should send only the header.
fn extract_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Middleware that requires a valid token for an existing identity.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, &request).ok_or(AppError::MissingToken)?;

    let identity = state.auth.verify_token(&token).await.map_err(|e| {
        if e.is_authentication_error() {
            tracing::debug!(error = %e, "Rejected request token");
        }
        e
    })?;

    request.extensions_mut().insert(AuthUser { identity });

    Ok(next.run(request).await)
}

/// Decide whether `role` may use a resource that needs `required`.
pub fn authorize(role: Role, required: Role) -> Result<(), AppError> {
    if role.satisfies(required) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Middleware that requires the admin role. Must run after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        tracing::error!("require_admin used without require_auth");
        return Err(AppError::MissingToken);
    };

    if let Err(e) = authorize(user.identity.role, Role::Admin) {
        tracing::info!(identity_id = %user.identity.id, "Admin route denied");
        return Err(e);
    }

    Ok(next.run(request).await)
}
