// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exam notifications (application windows, admit cards, results).

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Exam a notification targets, or `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum NotificationType {
    #[serde(rename = "CDS")]
    Cds,
    #[serde(rename = "NDA")]
    Nda,
    #[serde(rename = "AFCAT")]
    Afcat,
    #[serde(rename = "CAPF")]
    Capf,
    #[serde(rename = "SSB")]
    Ssb,
    All,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::Cds => "CDS",
            NotificationType::Nda => "NDA",
            NotificationType::Afcat => "AFCAT",
            NotificationType::Capf => "CAPF",
            NotificationType::Ssb => "SSB",
            NotificationType::All => "All",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            NotificationType::Cds,
            NotificationType::Nda,
            NotificationType::Afcat,
            NotificationType::Capf,
            NotificationType::Ssb,
            NotificationType::All,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown notification type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    ExamNotification,
    ApplicationOpen,
    AdmitCard,
    Result,
    InterviewSchedule,
    GuidelineUpdate,
}

impl NotificationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationCategory::ExamNotification => "exam_notification",
            NotificationCategory::ApplicationOpen => "application_open",
            NotificationCategory::AdmitCard => "admit_card",
            NotificationCategory::Result => "result",
            NotificationCategory::InterviewSchedule => "interview_schedule",
            NotificationCategory::GuidelineUpdate => "guideline_update",
        }
    }
}

impl std::str::FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            NotificationCategory::ExamNotification,
            NotificationCategory::ApplicationOpen,
            NotificationCategory::AdmitCard,
            NotificationCategory::Result,
            NotificationCategory::InterviewSchedule,
            NotificationCategory::GuidelineUpdate,
        ]
        .into_iter()
        .find(|c| c.as_str() == s.trim())
        .ok_or_else(|| format!("unknown notification category '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Notification stored in the `notifications` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub category: NotificationCategory,
    /// Announcement date, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub priority: Priority,
    pub exam_date: Option<String>,
    pub last_date_to_apply: Option<String>,
    pub link: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub kind: Option<NotificationType>,
    pub category: Option<NotificationCategory>,
}

impl NotificationFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        self.kind.map_or(true, |k| notification.kind == k)
            && self.category.map_or(true, |c| notification.category == c)
    }
}

/// Newest first by date, then by creation time.
pub fn sort_newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
