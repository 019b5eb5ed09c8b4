// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login, token verification and profile updates.

use crate::config::AdminBootstrap;
use crate::db::IdentityStore;
use crate::error::AppError;
use crate::models::user::DEFAULT_AVATAR;
use crate::models::{ExamTag, Identity, PasswordCredential, Profile, Role};
use crate::services::password::PasswordService;
use crate::services::token::TokenService;
use crate::time_utils::{format_utc_rfc3339, Clock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Registration input. No `Debug`: it carries a plaintext password.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "name must be 2-50 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub exam_preparation: Option<Vec<ExamTag>>,
}

/// Login input. No `Debug`: it carries a plaintext password.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50, message = "name must be 2-50 characters"))]
    pub name: Option<String>,
    pub exam_preparation: Option<Vec<ExamTag>>,
    #[validate(url(message = "avatar must be a URL"))]
    pub avatar: Option<String>,
}

/// Successful register/login result.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthSession {
    pub user: Profile,
    pub token: String,
}

/// Trim and lowercase an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim an optional text field, dropping it if blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct AuthService {
    identities: Arc<dyn IdentityStore>,
    passwords: PasswordService,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        passwords: PasswordService,
        tokens: TokenService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identities,
            passwords,
            tokens,
            clock,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create an account and sign it in.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthSession, AppError> {
        let req = RegisterRequest {
            name: req.name.trim().to_string(),
            email: normalize_email(&req.email),
            ..req
        };
        req.validate()?;

        let exam_preparation = req.exam_preparation.unwrap_or_default();
        let identity = self
            .create_identity(req.name, req.email, &req.password, Role::User, exam_preparation)
            .await?;

        tracing::info!(identity_id = %identity.id, "Registered new account");

        let token = self.tokens.issue(&identity.id)?;
        Ok(AuthSession {
            user: Profile::from(&identity),
            token,
        })
    }

    /// Check credentials and issue a fresh token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthSession, AppError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let Some(identity) = self.identities.find_by_email(&email).await? else {
            tracing::info!("Login failed");
            return Err(AppError::InvalidCredentials);
        };

        let Some(credential) = self.identities.get_credential(&identity.id).await? else {
            tracing::warn!(identity_id = %identity.id, "Identity has no stored credential");
            return Err(AppError::InvalidCredentials);
        };

        if !self
            .passwords
            .verify_password_async(&req.password, &credential.password_hash)
            .await?
        {
            tracing::info!("Login failed");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(identity_id = %identity.id, "Login succeeded");

        let token = self.tokens.issue(&identity.id)?;
        Ok(AuthSession {
            user: Profile::from(&identity),
            token,
        })
    }

    /// Resolve a bearer token to the identity it names.
    pub async fn verify_token(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self.tokens.decode(token)?;

        self.identities
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::IdentityNotFound)
    }

    /// Apply a partial profile update. The password credential is untouched.
    pub async fn update_profile(
        &self,
        identity: &Identity,
        req: UpdateProfileRequest,
    ) -> Result<Identity, AppError> {
        let req = UpdateProfileRequest {
            name: non_blank(req.name),
            avatar: non_blank(req.avatar),
            ..req
        };
        req.validate()?;

        let mut updated = self
            .identities
            .find_by_id(&identity.id)
            .await?
            .ok_or(AppError::IdentityNotFound)?;

        if let Some(name) = req.name {
            updated.name = name;
        }
        if let Some(exams) = req.exam_preparation {
            updated.exam_preparation = exams.into_iter().collect();
        }
        if let Some(avatar) = req.avatar {
            updated.avatar = avatar;
        }
        updated.updated_at = format_utc_rfc3339(self.clock.now());

        self.identities.save(&updated).await?;
        tracing::debug!(identity_id = %updated.id, "Profile updated");

        Ok(updated)
    }

    /// Make sure the configured admin account exists and has the admin role.
    ///
    /// An existing account is promoted without changing its password.
    pub async fn ensure_admin(&self, admin: &AdminBootstrap) -> Result<Identity, AppError> {
        let email = normalize_email(&admin.email);

        if let Some(mut existing) = self.identities.find_by_email(&email).await? {
            if existing.role != Role::Admin {
                existing.role = Role::Admin;
                existing.updated_at = format_utc_rfc3339(self.clock.now());
                self.identities.save(&existing).await?;
                tracing::info!(identity_id = %existing.id, "Promoted existing account to admin");
            }
            return Ok(existing);
        }

        let req = RegisterRequest {
            name: admin.name.trim().to_string(),
            email,
            password: admin.password.clone(),
            exam_preparation: None,
        };
        req.validate()?;

        let identity = self
            .create_identity(req.name, req.email, &req.password, Role::Admin, Vec::new())
            .await?;
        tracing::info!(identity_id = %identity.id, "Created admin account");
        Ok(identity)
    }

    /// Store a new identity with its credential. Inputs are already
    /// validated and normalized.
    ///
    /// The email is claimed before anything else is written; the claim is
    /// released again if a later step fails.
    async fn create_identity(
        &self,
        name: String,
        email: String,
        password: &str,
        role: Role,
        exam_preparation: Vec<ExamTag>,
    ) -> Result<Identity, AppError> {
        // Accounts created before email claims existed have no claim document.
        if self.identities.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.identities.reserve_email(&email, &id).await?;

        let result = self
            .store_identity(id, name, email.clone(), password, role, exam_preparation)
            .await;
        if result.is_err() {
            if let Err(e) = self.identities.release_email(&email).await {
                tracing::warn!(error = %e, "Failed to release email claim");
            }
        }
        result
    }

    async fn store_identity(
        &self,
        id: String,
        name: String,
        email: String,
        password: &str,
        role: Role,
        exam_preparation: Vec<ExamTag>,
    ) -> Result<Identity, AppError> {
        let password_hash = self.passwords.hash_password_async(password).await?;
        let now = format_utc_rfc3339(self.clock.now());

        let identity = Identity {
            id,
            name,
            email,
            role,
            exam_preparation: exam_preparation.into_iter().collect(),
            bookmarks: Vec::new(),
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        // Credential goes in first so that every stored identity has one.
        self.identities
            .set_credential(
                &identity.id,
                &PasswordCredential {
                    password_hash,
                    updated_at: now,
                },
            )
            .await?;
        self.identities.save(&identity).await?;

        Ok(identity)
    }
}
