// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: register, login, logout and the signed-in profile.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::{AuthUser, TOKEN_COOKIE};
use crate::models::Profile;
use crate::routes::extract::ApiJson;
use crate::routes::ApiResponse;
use crate::services::{AuthSession, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::AppState;

/// Routes that issue or clear a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// Routes for the signed-in identity. Auth is applied in routes/mod.rs.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/profile", put(update_profile))
}

/// Session cookie for browser clients; API clients use the token in the body.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.frontend_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .build()
}

/// Create an account and sign it in.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<AuthSession>>)> {
    let session = state.auth.register(req).await?;
    let jar = jar.add(session_cookie(&state, session.token.clone()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::data(session).with_message("User registered successfully")),
    ))
}

/// Exchange email and password for a token.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<AuthSession>>)> {
    let session = state.auth.login(req).await?;
    let jar = jar.add(session_cookie(&state, session.token.clone()));

    Ok((
        jar,
        Json(ApiResponse::data(session).with_message("Logged in successfully")),
    ))
}

/// Clear the session cookie. Tokens are not revoked server-side.
async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    // Added rather than `jar.remove`, which only emits a removal for a
    // cookie the request actually carried.
    let mut removal = Cookie::build((TOKEN_COOKIE, "")).path("/").build();
    removal.make_removal();

    (jar.add(removal), Json(ApiResponse::message("Logged out")))
}

/// Get current user profile.
async fn get_me(Extension(user): Extension<AuthUser>) -> Json<ApiResponse<Profile>> {
    Json(ApiResponse::data(Profile::from(&user.identity)))
}

/// Update name, exam preparation or avatar.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<Profile>>> {
    let updated = state.auth.update_profile(&user.identity, req).await?;

    Ok(Json(
        ApiResponse::data(Profile::from(&updated)).with_message("Profile updated successfully"),
    ))
}
