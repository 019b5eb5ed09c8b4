//! Database layer: storage ports and their Firestore / in-memory backends.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{
    Article, ArticleFilter, CalendarEvent, Identity, Notification, NotificationFilter,
    PasswordCredential,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Password hashes (keyed by identity id)
    pub const CREDENTIALS: &str = "credentials";
    /// Email ownership claims (keyed by normalized email)
    pub const EMAILS: &str = "emails";
    pub const ARTICLES: &str = "articles";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const CALENDAR_EVENTS: &str = "calendar_events";
}

/// Identity persistence.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError>;

    /// Lookup by normalized (trimmed, lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError>;

    /// Atomically claim a normalized email for an identity id.
    ///
    /// Fails with `DuplicateEmail` if the address is already claimed.
    async fn reserve_email(&self, email: &str, id: &str) -> Result<(), AppError>;

    /// Drop a claim taken by `reserve_email`.
    async fn release_email(&self, email: &str) -> Result<(), AppError>;

    /// Create or replace the identity document.
    async fn save(&self, identity: &Identity) -> Result<(), AppError>;

    /// All identities, newest first.
    async fn list(&self) -> Result<Vec<Identity>, AppError>;

    async fn get_credential(&self, id: &str) -> Result<Option<PasswordCredential>, AppError>;

    async fn set_credential(
        &self,
        id: &str,
        credential: &PasswordCredential,
    ) -> Result<(), AppError>;
}

/// Article persistence.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, AppError>;

    /// Matching articles, newest first.
    async fn find_many(&self, filter: &ArticleFilter) -> Result<Vec<Article>, AppError>;

    async fn save(&self, article: &Article) -> Result<(), AppError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Matching notifications, newest first.
    async fn find_many(&self, filter: &NotificationFilter)
        -> Result<Vec<Notification>, AppError>;

    async fn save(&self, notification: &Notification) -> Result<(), AppError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// Per-identity calendar persistence.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Events owned by `user_id`, earliest date first.
    async fn find_for_user(&self, user_id: &str) -> Result<Vec<CalendarEvent>, AppError>;

    async fn save(&self, event: &CalendarEvent) -> Result<(), AppError>;

    /// Delete event `id` if `user_id` owns it. Returns `false` if there was
    /// no such event or it belongs to someone else.
    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool, AppError>;
}

/// Store handles shared by services and routes.
#[derive(Clone)]
pub struct Stores {
    pub identities: Arc<dyn IdentityStore>,
    pub articles: Arc<dyn ArticleStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub calendar: Arc<dyn CalendarStore>,
}

impl Stores {
    pub fn firestore(db: FirestoreDb) -> Self {
        let db = Arc::new(db);
        Self {
            identities: db.clone(),
            articles: db.clone(),
            notifications: db.clone(),
            calendar: db,
        }
    }

    pub fn memory() -> Self {
        let db = Arc::new(MemoryDb::new());
        Self {
            identities: db.clone(),
            articles: db.clone(),
            notifications: db.clone(),
            calendar: db,
        }
    }
}
