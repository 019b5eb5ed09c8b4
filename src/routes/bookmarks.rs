// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookmark routes for the signed-in identity.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Article;
use crate::routes::extract::ApiPath;
use crate::routes::ApiResponse;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Bookmark routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookmarks", get(list_bookmarks))
        .route(
            "/api/bookmarks/{article_id}",
            post(add_bookmark).delete(remove_bookmark),
        )
        .route("/api/bookmarks/check/{article_id}", get(check_bookmark))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkCheck {
    pub is_bookmarked: bool,
}

/// Bookmarked articles, skipping any that were deleted.
async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Article>>>> {
    let articles = state.bookmarks.list(&user.identity).await?;
    Ok(Json(ApiResponse::list(articles)))
}

async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(article_id): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let ids = state.bookmarks.add(&user.identity, &article_id).await?;
    Ok(Json(ApiResponse::data(ids).with_message("Bookmark added")))
}

async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(article_id): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let ids = state.bookmarks.remove(&user.identity, &article_id).await?;
    Ok(Json(ApiResponse::data(ids).with_message("Bookmark removed")))
}

async fn check_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(article_id): ApiPath<String>,
) -> Json<ApiResponse<BookmarkCheck>> {
    let is_bookmarked = state.bookmarks.is_bookmarked(&user.identity, &article_id);
    Json(ApiResponse::data(BookmarkCheck { is_bookmarked }))
}
