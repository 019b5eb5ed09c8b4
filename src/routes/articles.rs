// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Article routes: public browsing and admin CRUD.

use crate::error::{AppError, Result};
use crate::models::article::DEFAULT_ARTICLE_IMAGE;
use crate::models::exam::parse_filter;
use crate::models::{Article, ArticleCategory, ArticleFilter, ExamTag};
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::{validate_date, ApiResponse};
use crate::time_utils::{format_date, format_utc_rfc3339};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/articles", get(list_articles))
        .route("/api/articles/{id}", get(get_article))
}

/// Admin-only article routes. The role gate is applied in routes/mod.rs.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/articles", post(create_article))
        .route(
            "/api/articles/{id}",
            put(update_article).delete(delete_article),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesQuery {
    pub category: Option<String>,
    pub exam_tag: Option<String>,
    pub search: Option<String>,
}

impl ArticlesQuery {
    fn into_filter(self) -> Result<ArticleFilter> {
        Ok(ArticleFilter {
            category: parse_filter(self.category.as_deref()).map_err(AppError::Validation)?,
            exam_tag: parse_filter(self.exam_tag.as_deref()).map_err(AppError::Validation)?,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "excerpt is required"))]
    pub excerpt: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    pub category: ArticleCategory,
    #[serde(default)]
    pub exam_tags: Vec<ExamTag>,
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
    #[validate(url(message = "image must be a URL"))]
    pub image: Option<String>,
    #[serde(default)]
    pub important_points: Vec<String>,
    pub exam_importance: Option<String>,
}

/// Partial article update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "excerpt must not be empty"))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: Option<String>,
    pub category: Option<ArticleCategory>,
    pub exam_tags: Option<Vec<ExamTag>>,
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
    #[validate(url(message = "image must be a URL"))]
    pub image: Option<String>,
    pub important_points: Option<Vec<String>>,
    pub exam_importance: Option<String>,
}

impl UpdateArticleRequest {
    fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            article.excerpt = excerpt;
        }
        if let Some(content) = self.content {
            article.content = content;
        }
        if let Some(category) = self.category {
            article.category = category;
        }
        if let Some(tags) = self.exam_tags {
            article.exam_tags = dedup_tags(tags);
        }
        if let Some(date) = self.date {
            article.date = date;
        }
        if let Some(image) = self.image {
            article.image = image;
        }
        if let Some(points) = self.important_points {
            article.important_points = points;
        }
        if let Some(importance) = self.exam_importance {
            article.exam_importance = Some(importance);
        }
    }
}

/// Exam tags form a set; keep first occurrence order.
fn dedup_tags(tags: Vec<ExamTag>) -> Vec<ExamTag> {
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// List articles, newest first. `All` or an absent parameter means no filter.
async fn list_articles(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ArticlesQuery>,
) -> Result<Json<ApiResponse<Vec<Article>>>> {
    let filter = query.into_filter()?;
    let articles = state.stores.articles.find_many(&filter).await?;
    Ok(Json(ApiResponse::list(articles)))
}

async fn get_article(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<Article>>> {
    let article = state
        .stores
        .articles
        .find_by_id(&id)
        .await?
        .ok_or(AppError::ArticleNotFound)?;
    Ok(Json(ApiResponse::data(article)))
}

async fn create_article(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Article>>)> {
    let req = CreateArticleRequest {
        title: req.title.trim().to_string(),
        ..req
    };
    req.validate()?;

    let now = state.clock.now();
    let timestamp = format_utc_rfc3339(now);
    let article = Article {
        id: uuid::Uuid::new_v4().to_string(),
        title: req.title,
        excerpt: req.excerpt,
        content: req.content,
        category: req.category,
        exam_tags: dedup_tags(req.exam_tags),
        date: req.date.unwrap_or_else(|| format_date(now)),
        image: req
            .image
            .unwrap_or_else(|| DEFAULT_ARTICLE_IMAGE.to_string()),
        important_points: req.important_points,
        exam_importance: req.exam_importance,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };

    state.stores.articles.save(&article).await?;
    tracing::info!(article_id = %article.id, category = %article.category.as_str(), "Article created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(article).with_message("Article created successfully")),
    ))
}

async fn update_article(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<UpdateArticleRequest>,
) -> Result<Json<ApiResponse<Article>>> {
    let req = UpdateArticleRequest {
        title: req.title.map(|t| t.trim().to_string()),
        ..req
    };
    req.validate()?;

    let mut article = state
        .stores
        .articles
        .find_by_id(&id)
        .await?
        .ok_or(AppError::ArticleNotFound)?;

    req.apply(&mut article);
    article.updated_at = format_utc_rfc3339(state.clock.now());

    state.stores.articles.save(&article).await?;
    tracing::info!(article_id = %article.id, "Article updated");

    Ok(Json(
        ApiResponse::data(article).with_message("Article updated successfully"),
    ))
}

/// Delete an article. Bookmarks pointing at it are left in place.
async fn delete_article(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.stores.articles.delete(&id).await? {
        return Err(AppError::ArticleNotFound);
    }
    tracing::info!(article_id = %id, "Article deleted");

    Ok(Json(ApiResponse::message("Article deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_filter() {
        let filter = ArticlesQuery {
            category: Some("Air Force".to_string()),
            exam_tag: Some("All".to_string()),
            search: Some("  rafale ".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.category, Some(ArticleCategory::AirForce));
        assert_eq!(filter.exam_tag, None);
        assert_eq!(filter.search.as_deref(), Some("rafale"));

        let err = ArticlesQuery {
            category: Some("Coast Guard".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateArticleRequest = serde_json::from_value(serde_json::json!({
            "title": "INS Vikrant sea trials",
            "excerpt": "Carrier update",
            "content": "Full text",
            "category": "Navy",
            "examTags": ["CDS", "NDA", "CDS"],
            "date": "2026-13-01"
        }))
        .unwrap();
        assert!(req.validate().is_err());
        assert_eq!(dedup_tags(req.exam_tags), vec![ExamTag::Cds, ExamTag::Nda]);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut article = Article {
            id: "a1".to_string(),
            title: "Old".to_string(),
            excerpt: "Excerpt".to_string(),
            content: "Content".to_string(),
            category: ArticleCategory::Army,
            exam_tags: vec![ExamTag::Cds],
            date: "2026-01-01".to_string(),
            image: DEFAULT_ARTICLE_IMAGE.to_string(),
            important_points: vec!["one".to_string()],
            exam_importance: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        };

        UpdateArticleRequest {
            title: Some("New".to_string()),
            category: Some(ArticleCategory::JointForces),
            ..Default::default()
        }
        .apply(&mut article);

        assert_eq!(article.title, "New");
        assert_eq!(article.category, ArticleCategory::JointForces);
        assert_eq!(article.excerpt, "Excerpt");
        assert_eq!(article.exam_tags, vec![ExamTag::Cds]);
        assert_eq!(article.important_points, vec!["one"]);
    }
}
