// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! CommandPost: content portal for defence-exam aspirants
//!
//! This crate provides the backend API: accounts and session tokens,
//! role-gated admin CRUD for articles and notifications, and per-user
//! article bookmarks.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Stores;
use error::AppError;
use services::{AuthService, BookmarkService, PasswordService, TokenService};
use std::sync::Arc;
use time_utils::Clock;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    pub clock: Arc<dyn Clock>,
    pub auth: AuthService,
    pub bookmarks: BookmarkService,
}

impl AppState {
    /// Wire services over the given stores and clock.
    pub fn new(config: Config, stores: Stores, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let passwords = PasswordService::new(config.password_cost)?;
        let tokens = TokenService::new(&config.jwt_signing_key, clock.clone());

        let auth = AuthService::new(
            stores.identities.clone(),
            passwords,
            tokens,
            clock.clone(),
        );
        let bookmarks = BookmarkService::new(
            stores.identities.clone(),
            stores.articles.clone(),
            clock.clone(),
        );

        Ok(Self {
            config,
            stores,
            clock,
            auth,
            bookmarks,
        })
    }
}
