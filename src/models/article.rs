// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Article model and list filtering.

use crate::models::ExamTag;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const DEFAULT_ARTICLE_IMAGE: &str =
    "https://images.unsplash.com/photo-1541339907198-e08756dedf3f?w=800";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ArticleCategory {
    Army,
    Navy,
    #[serde(rename = "Air Force")]
    AirForce,
    #[serde(rename = "Joint Forces")]
    JointForces,
}

impl ArticleCategory {
    pub const ALL: [ArticleCategory; 4] = [
        ArticleCategory::Army,
        ArticleCategory::Navy,
        ArticleCategory::AirForce,
        ArticleCategory::JointForces,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArticleCategory::Army => "Army",
            ArticleCategory::Navy => "Navy",
            ArticleCategory::AirForce => "Air Force",
            ArticleCategory::JointForces => "Joint Forces",
        }
    }
}

impl std::str::FromStr for ArticleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArticleCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Article stored in the `articles` collection (document ID = `id`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: ArticleCategory,
    #[serde(default)]
    pub exam_tags: Vec<ExamTag>,
    /// Publication date, `YYYY-MM-DD`
    pub date: String,
    pub image: String,
    #[serde(default)]
    pub important_points: Vec<String>,
    #[serde(default)]
    pub exam_importance: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Filter for article listings. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<ArticleCategory>,
    pub exam_tag: Option<ExamTag>,
    /// Case-insensitive substring over title, excerpt and content
    pub search: Option<String>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        self.category.map_or(true, |c| article.category == c)
            && self.exam_tag.map_or(true, |t| article.exam_tags.contains(&t))
            && self.matches_text(article)
    }

    /// Text part of the filter only (stores that filter fields server-side
    /// apply this afterwards).
    pub fn matches_text(&self, article: &Article) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim) else {
            return true;
        };
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        [&article.title, &article.excerpt, &article.content]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Newest first by publication date, then by creation time.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
