// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookmark relation between identities and articles.
//!
//! Bookmarks live inside the identity document. Mutations are a plain
//! read-modify-write with no transaction: two concurrent adds for the same
//! identity are last-write-wins, so one of them may be lost. Deleting an
//! article does not clean up bookmarks that point at it; listings skip
//! those dangling IDs instead.

use crate::db::{ArticleStore, IdentityStore};
use crate::error::AppError;
use crate::models::{Article, Identity};
use crate::time_utils::{format_utc_rfc3339, Clock};
use std::sync::Arc;

#[derive(Clone)]
pub struct BookmarkService {
    identities: Arc<dyn IdentityStore>,
    articles: Arc<dyn ArticleStore>,
    clock: Arc<dyn Clock>,
}

impl BookmarkService {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        articles: Arc<dyn ArticleStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identities,
            articles,
            clock,
        }
    }

    /// Bookmark an existing article. Returns the updated bookmark IDs.
    pub async fn add(&self, identity: &Identity, article_id: &str) -> Result<Vec<String>, AppError> {
        if !self.articles.exists(article_id).await? {
            return Err(AppError::ArticleNotFound);
        }

        let mut current = self.reload(identity).await?;
        if current.has_bookmark(article_id) {
            return Err(AppError::AlreadyBookmarked);
        }

        current.bookmarks.push(article_id.to_string());
        current.updated_at = format_utc_rfc3339(self.clock.now());
        self.identities.save(&current).await?;

        tracing::debug!(identity_id = %current.id, article_id, "Bookmark added");
        Ok(current.bookmarks)
    }

    /// Remove a bookmark if present. Removing an absent bookmark succeeds.
    pub async fn remove(
        &self,
        identity: &Identity,
        article_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let mut current = self.reload(identity).await?;

        let before = current.bookmarks.len();
        current.bookmarks.retain(|id| id != article_id);
        current.updated_at = format_utc_rfc3339(self.clock.now());
        self.identities.save(&current).await?;

        tracing::debug!(
            identity_id = %current.id,
            article_id,
            removed = before != current.bookmarks.len(),
            "Bookmark removed"
        );
        Ok(current.bookmarks)
    }

    /// Resolve bookmarked IDs to articles, skipping any that no longer exist.
    pub async fn list(&self, identity: &Identity) -> Result<Vec<Article>, AppError> {
        let current = self.reload(identity).await?;

        let mut articles = Vec::with_capacity(current.bookmarks.len());
        for id in &current.bookmarks {
            match self.articles.find_by_id(id).await? {
                Some(article) => articles.push(article),
                None => {
                    tracing::debug!(identity_id = %current.id, article_id = %id, "Skipping dangling bookmark")
                }
            }
        }
        Ok(articles)
    }

    /// Membership test against the identity as resolved for this request.
    pub fn is_bookmarked(&self, identity: &Identity, article_id: &str) -> bool {
        identity.has_bookmark(article_id)
    }

    /// Fresh copy of the identity so mutations start from stored state.
    async fn reload(&self, identity: &Identity) -> Result<Identity, AppError> {
        self.identities
            .find_by_id(&identity.id)
            .await?
            .ok_or(AppError::IdentityNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::models::article::DEFAULT_ARTICLE_IMAGE;
    use crate::models::user::DEFAULT_AVATAR;
    use crate::models::{ArticleCategory, Role};
    use crate::time_utils::MockClock;
    use chrono::DateTime;

    fn article(id: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Article {}", id),
            excerpt: "excerpt".to_string(),
            content: "content".to_string(),
            category: ArticleCategory::Navy,
            exam_tags: vec![],
            date: "2026-01-01".to_string(),
            image: DEFAULT_ARTICLE_IMAGE.to_string(),
            important_points: vec![],
            exam_importance: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    async fn setup() -> (BookmarkService, Arc<MemoryDb>, Identity) {
        let db = Arc::new(MemoryDb::new());
        let clock = Arc::new(MockClock::new(DateTime::from_timestamp(1_767_225_600, 0).unwrap()));
        let identity = Identity {
            id: "user-1".to_string(),
            name: "Cadet".to_string(),
            email: "cadet@example.com".to_string(),
            role: Role::User,
            exam_preparation: Default::default(),
            bookmarks: vec![],
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        };
        IdentityStore::save(db.as_ref(), &identity).await.unwrap();
        for id in ["a1", "a2"] {
            ArticleStore::save(db.as_ref(), &article(id)).await.unwrap();
        }
        let service = BookmarkService::new(db.clone(), db.clone(), clock);
        (service, db, identity)
    }

    #[tokio::test]
    async fn test_add_then_duplicate_rejected() {
        let (service, db, identity) = setup().await;

        let ids = service.add(&identity, "a1").await.unwrap();
        assert_eq!(ids, vec!["a1"]);

        let err = service.add(&identity, "a1").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyBookmarked));

        let stored = IdentityStore::find_by_id(db.as_ref(), "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.bookmarks, vec!["a1"]);
        assert_eq!(stored.updated_at, "2026-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_add_unknown_article() {
        let (service, db, identity) = setup().await;

        let err = service.add(&identity, "missing").await.unwrap_err();
        assert!(matches!(err, AppError::ArticleNotFound));

        let stored = IdentityStore::find_by_id(db.as_ref(), "user-1")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.bookmarks.is_empty());
    }

    #[tokio::test]
    async fn test_add_uses_stored_state_not_stale_copy() {
        let (service, _db, stale) = setup().await;

        service.add(&stale, "a1").await.unwrap();
        // `stale` still has no bookmarks; the second add must not drop a1.
        let ids = service.add(&stale, "a2").await.unwrap();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (service, _db, identity) = setup().await;
        service.add(&identity, "a1").await.unwrap();
        service.add(&identity, "a2").await.unwrap();

        assert_eq!(service.remove(&identity, "a1").await.unwrap(), vec!["a2"]);
        assert_eq!(service.remove(&identity, "a1").await.unwrap(), vec!["a2"]);
        assert_eq!(
            service.remove(&identity, "never-added").await.unwrap(),
            vec!["a2"]
        );
    }

    #[tokio::test]
    async fn test_list_skips_deleted_articles() {
        let (service, db, identity) = setup().await;
        service.add(&identity, "a1").await.unwrap();
        service.add(&identity, "a2").await.unwrap();

        ArticleStore::delete(db.as_ref(), "a1").await.unwrap();

        let articles = service.list(&identity).await.unwrap();
        let ids: Vec<_> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2"]);

        // The dangling ID stays in the stored list.
        let stored = IdentityStore::find_by_id(db.as_ref(), "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.bookmarks, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_is_bookmarked_reads_given_identity() {
        let (service, _db, mut identity) = setup().await;
        assert!(!service.is_bookmarked(&identity, "a1"));
        identity.bookmarks = service.add(&identity, "a1").await.unwrap();
        assert!(service.is_bookmarked(&identity, "a1"));
        assert!(!service.is_bookmarked(&identity, "a2"));
    }

    #[tokio::test]
    async fn test_missing_identity() {
        let (service, _db, mut identity) = setup().await;
        identity.id = "ghost".to_string();
        let err = service.add(&identity, "a1").await.unwrap_err();
        assert!(matches!(err, AppError::IdentityNotFound));
    }
}
