// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity documents)
//! - Credentials (password hashes, keyed by user id)
//! - Articles
//! - Notifications
//! - Calendar events

use crate::db::{collections, ArticleStore, CalendarStore, IdentityStore, NotificationStore};
use crate::error::AppError;
use crate::models::{
    article, calendar, notification, Article, ArticleFilter, CalendarEvent, Identity,
    Notification, NotificationFilter, PasswordCredential,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Document in the `emails` collection; its id is the normalized address.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailClaim {
    identity_id: String,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a disconnected client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

// ─── User Operations ─────────────────────────────────────────

#[async_trait]
impl IdentityStore for FirestoreDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        let matches: Vec<Identity> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.field("email").eq(email))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// `insert` creates the document only if it is absent, so two
    /// concurrent claims on one address cannot both succeed.
    async fn reserve_email(&self, email: &str, id: &str) -> Result<(), AppError> {
        let claim = EmailClaim {
            identity_id: id.to_string(),
        };
        let result: Result<EmailClaim, _> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::EMAILS)
            .document_id(email)
            .object(&claim)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                Err(AppError::DuplicateEmail)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn release_email(&self, email: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::EMAILS)
            .document_id(email)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn save(&self, identity: &Identity) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&identity.id)
            .object(identity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Identity>, AppError> {
        let mut identities: Vec<Identity> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        identities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(identities)
    }

    // ─── Credential Operations ───────────────────────────────

    async fn get_credential(&self, id: &str) -> Result<Option<PasswordCredential>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CREDENTIALS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_credential(
        &self,
        id: &str,
        credential: &PasswordCredential,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CREDENTIALS)
            .document_id(id)
            .object(credential)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

// ─── Article Operations ──────────────────────────────────────

#[async_trait]
impl ArticleStore for FirestoreDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ARTICLES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Category and exam tag are filtered server-side; the text search and
    /// ordering are applied here (Firestore has no full-text search, and
    /// ordering on top of the filters would need composite indexes).
    async fn find_many(&self, filter: &ArticleFilter) -> Result<Vec<Article>, AppError> {
        let category = filter.category;
        let exam_tag = filter.exam_tag;

        let mut articles: Vec<Article> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ARTICLES)
            .filter(move |q| {
                q.for_all([
                    category.and_then(|c| q.field("category").eq(c.as_str())),
                    exam_tag.and_then(|t| q.field("examTags").array_contains(t.as_str())),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        articles.retain(|a| filter.matches_text(a));
        article::sort_newest_first(&mut articles);
        Ok(articles)
    }

    async fn save(&self, article: &Article) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ARTICLES)
            .document_id(&article.id)
            .object(article)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        if ArticleStore::find_by_id(self, id).await?.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ARTICLES)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }
}

// ─── Notification Operations ─────────────────────────────────

#[async_trait]
impl NotificationStore for FirestoreDb {
    async fn find_many(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<Notification>, AppError> {
        let kind = filter.kind;
        let category = filter.category;

        let mut notifications: Vec<Notification> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::NOTIFICATIONS)
            .filter(move |q| {
                q.for_all([
                    kind.and_then(|k| q.field("type").eq(k.as_str())),
                    category.and_then(|c| q.field("category").eq(c.as_str())),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        notification::sort_newest_first(&mut notifications);
        Ok(notifications)
    }

    async fn save(&self, notification: &Notification) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::NOTIFICATIONS)
            .document_id(&notification.id)
            .object(notification)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let existing: Option<Notification> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::NOTIFICATIONS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::NOTIFICATIONS)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }
}

// ─── Calendar Operations ─────────────────────────────────────

#[async_trait]
impl CalendarStore for FirestoreDb {
    async fn find_for_user(&self, user_id: &str) -> Result<Vec<CalendarEvent>, AppError> {
        let mut events: Vec<CalendarEvent> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CALENDAR_EVENTS)
            .filter(|q| q.field("userId").eq(user_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        calendar::sort_by_date(&mut events);
        Ok(events)
    }

    async fn save(&self, event: &CalendarEvent) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CALENDAR_EVENTS)
            .document_id(&event.id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool, AppError> {
        let existing: Option<CalendarEvent> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CALENDAR_EVENTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match existing {
            Some(event) if event.user_id == user_id => {}
            _ => return Ok(false),
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::CALENDAR_EVENTS)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }
}
