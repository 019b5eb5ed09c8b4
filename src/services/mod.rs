// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod bookmarks;
pub mod password;
pub mod token;

pub use auth::{AuthService, AuthSession, LoginRequest, RegisterRequest, UpdateProfileRequest};
pub use bookmarks::BookmarkService;
pub use password::PasswordService;
pub use token::{Claims, TokenService, TOKEN_TTL_DAYS};
