// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod article;
pub mod calendar;
pub mod exam;
pub mod notification;
pub mod user;

pub use article::{Article, ArticleCategory, ArticleFilter};
pub use calendar::{CalendarEvent, EventColor};
pub use exam::ExamTag;
pub use notification::{
    Notification, NotificationCategory, NotificationFilter, NotificationType, Priority,
};
pub use user::{Identity, PasswordCredential, Profile, Role};
