// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dashboard routes: user listing and content analytics.

use crate::error::Result;
use crate::models::{
    Article, ArticleCategory, ArticleFilter, Notification, NotificationFilter, Profile,
};
use crate::routes::ApiResponse;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Admin-only routes. The role gate is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/analytics", get(get_analytics))
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Counts {
    pub users: usize,
    pub articles: usize,
    pub notifications: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Breakdowns {
    pub articles_by_category: BTreeMap<String, usize>,
    pub notifications_by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Analytics {
    pub counts: Counts,
    pub breakdowns: Breakdowns,
}

impl Analytics {
    /// Every article category appears, with zero if unused; notification
    /// types appear only when present.
    pub fn compute(users: usize, articles: &[Article], notifications: &[Notification]) -> Self {
        let mut articles_by_category: BTreeMap<String, usize> = ArticleCategory::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), 0))
            .collect();
        for article in articles {
            *articles_by_category
                .entry(article.category.as_str().to_string())
                .or_default() += 1;
        }

        let mut notifications_by_type = BTreeMap::new();
        for notification in notifications {
            *notifications_by_type
                .entry(notification.kind.as_str().to_string())
                .or_default() += 1;
        }

        Self {
            counts: Counts {
                users,
                articles: articles.len(),
                notifications: notifications.len(),
            },
            breakdowns: Breakdowns {
                articles_by_category,
                notifications_by_type,
            },
        }
    }
}

/// All accounts without password material, newest first.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<Vec<Profile>>>> {
    let identities = state.stores.identities.list().await?;
    let profiles = identities.iter().map(Profile::from).collect();
    Ok(Json(ApiResponse::list(profiles)))
}

async fn get_analytics(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<Analytics>>> {
    let article_filter = ArticleFilter::default();
    let notification_filter = NotificationFilter::default();
    let (users, articles, notifications) = tokio::try_join!(
        state.stores.identities.list(),
        state.stores.articles.find_many(&article_filter),
        state.stores.notifications.find_many(&notification_filter),
    )?;

    Ok(Json(ApiResponse::data(Analytics::compute(
        users.len(),
        &articles,
        &notifications,
    ))))
}
