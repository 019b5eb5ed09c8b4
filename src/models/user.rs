//! Identity model for storage and API.

use crate::models::ExamTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/150";

/// Account role. Admin satisfies every requirement a user does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Whether this role meets `required`.
    pub fn satisfies(self, required: Role) -> bool {
        match required {
            Role::User => true,
            Role::Admin => self == Role::Admin,
        }
    }
}

/// Registered account stored in the `users` collection (document ID = `id`).
///
/// The password hash lives in [`PasswordCredential`], never here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    /// Trimmed, lowercased login key
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub exam_preparation: BTreeSet<ExamTag>,
    /// Bookmarked article IDs, unique, in the order they were added
    #[serde(default)]
    pub bookmarks: Vec<String>,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    pub created_at: String,
    pub updated_at: String,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

impl Identity {
    pub fn has_bookmark(&self, article_id: &str) -> bool {
        self.bookmarks.iter().any(|id| id == article_id)
    }
}

/// Password hash for an identity, stored in the `credentials` collection
/// keyed by identity ID.
#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordCredential {
    /// Argon2id PHC string (algorithm, params and salt included)
    pub password_hash: String,
    pub updated_at: String,
}

impl std::fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Identity as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub exam_preparation: Vec<ExamTag>,
    pub bookmarks: Vec<String>,
    pub avatar: String,
    pub created_at: String,
}

impl From<&Identity> for Profile {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            role: identity.role,
            exam_preparation: identity.exam_preparation.iter().copied().collect(),
            bookmarks: identity.bookmarks.clone(),
            avatar: identity.avatar.clone(),
            created_at: identity.created_at.clone(),
        }
    }
}
