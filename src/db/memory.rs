// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process storage backend.
//!
//! Used by the test suite and for running the server without Firestore
//! (`STORAGE_BACKEND=memory`). Data does not survive a restart.

use crate::db::{ArticleStore, CalendarStore, IdentityStore, NotificationStore};
use crate::error::AppError;
use crate::models::{
    article, calendar, notification, Article, ArticleFilter, CalendarEvent, Identity,
    Notification, NotificationFilter, PasswordCredential,
};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryDb {
    users: DashMap<String, Identity>,
    credentials: DashMap<String, PasswordCredential>,
    emails: DashMap<String, String>,
    articles: DashMap<String, Article>,
    notifications: DashMap<String, Notification>,
    calendar: DashMap<String, CalendarEvent>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn reserve_email(&self, email: &str, id: &str) -> Result<(), AppError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AppError::DuplicateEmail),
            Entry::Vacant(slot) => {
                slot.insert(id.to_string());
                Ok(())
            }
        }
    }

    async fn release_email(&self, email: &str) -> Result<(), AppError> {
        self.emails.remove(email);
        Ok(())
    }

    async fn save(&self, identity: &Identity) -> Result<(), AppError> {
        self.users.insert(identity.id.clone(), identity.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Identity>, AppError> {
        let mut identities: Vec<Identity> =
            self.users.iter().map(|entry| entry.value().clone()).collect();
        identities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(identities)
    }

    async fn get_credential(&self, id: &str) -> Result<Option<PasswordCredential>, AppError> {
        Ok(self.credentials.get(id).map(|entry| entry.value().clone()))
    }

    async fn set_credential(
        &self,
        id: &str,
        credential: &PasswordCredential,
    ) -> Result<(), AppError> {
        self.credentials.insert(id.to_string(), credential.clone());
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for MemoryDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, AppError> {
        Ok(self.articles.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_many(&self, filter: &ArticleFilter) -> Result<Vec<Article>, AppError> {
        let mut articles: Vec<Article> = self
            .articles
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        article::sort_newest_first(&mut articles);
        Ok(articles)
    }

    async fn save(&self, article: &Article) -> Result<(), AppError> {
        self.articles.insert(article.id.clone(), article.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.articles.remove(id).is_some())
    }
}

#[async_trait]
impl NotificationStore for MemoryDb {
    async fn find_many(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<Notification>, AppError> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        notification::sort_newest_first(&mut notifications);
        Ok(notifications)
    }

    async fn save(&self, notification: &Notification) -> Result<(), AppError> {
        self.notifications
            .insert(notification.id.clone(), notification.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.notifications.remove(id).is_some())
    }
}

#[async_trait]
impl CalendarStore for MemoryDb {
    async fn find_for_user(&self, user_id: &str) -> Result<Vec<CalendarEvent>, AppError> {
        let mut events: Vec<CalendarEvent> = self
            .calendar
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        calendar::sort_by_date(&mut events);
        Ok(events)
    }

    async fn save(&self, event: &CalendarEvent) -> Result<(), AppError> {
        self.calendar.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool, AppError> {
        Ok(self
            .calendar
            .remove_if(id, |_, event| event.user_id == user_id)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleCategory, Role};

    fn identity(id: &str, email: &str, created_at: &str) -> Identity {
        Identity {
            id: id.to_string(),
            name: "Test".to_string(),
            email: email.to_string(),
            role: Role::User,
            exam_preparation: Default::default(),
            bookmarks: vec![],
            avatar: crate::models::user::DEFAULT_AVATAR.to_string(),
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_identity_lookup_and_listing_order() {
        let db = MemoryDb::new();
        IdentityStore::save(&db, &identity("a", "a@x.com", "2026-01-01T00:00:00Z"))
            .await
            .unwrap();
        IdentityStore::save(&db, &identity("b", "b@x.com", "2026-02-01T00:00:00Z"))
            .await
            .unwrap();

        let found = db.find_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, "b");
        assert!(db.find_by_email("c@x.com").await.unwrap().is_none());

        let ids: Vec<_> = db.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_email_reservation_is_exclusive() {
        let db = MemoryDb::new();
        db.reserve_email("a@x.com", "first").await.unwrap();

        let err = db.reserve_email("a@x.com", "second").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        db.release_email("a@x.com").await.unwrap();
        db.reserve_email("a@x.com", "second").await.unwrap();
    }

    #[tokio::test]
    async fn test_article_delete_reports_absence() {
        let db = MemoryDb::new();
        let article = Article {
            id: "art-1".to_string(),
            title: "Agniveer intake".to_string(),
            excerpt: "e".to_string(),
            content: "c".to_string(),
            category: ArticleCategory::Army,
            exam_tags: vec![],
            date: "2026-01-01".to_string(),
            image: article::DEFAULT_ARTICLE_IMAGE.to_string(),
            important_points: vec![],
            exam_importance: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        };
        ArticleStore::save(&db, &article).await.unwrap();

        assert!(db.exists("art-1").await.unwrap());
        assert!(ArticleStore::delete(&db, "art-1").await.unwrap());
        assert!(!ArticleStore::delete(&db, "art-1").await.unwrap());
        assert!(!db.exists("art-1").await.unwrap());
    }
}
