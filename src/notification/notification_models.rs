use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Severity shown next to a notification. Stored as lowercase text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl NotificationLevel {
    /// Lenient parse used for caller input: case-insensitive, anything
    /// unrecognized (or missing) becomes `Info`.
    pub fn normalize(input: Option<&str>) -> Self {
        input
            .and_then(|level| level.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for NotificationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(NotificationLevel::Info),
            "success" => Ok(NotificationLevel::Success),
            "error" => Ok(NotificationLevel::Error),
            "warning" => Ok(NotificationLevel::Warning),
            other => Err(format!("unknown notification level: {}", other)),
        }
    }
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Error => write!(f, "error"),
            NotificationLevel::Warning => write!(f, "warning"),
        }
    }
}

/// Which flag a bulk or single-row update resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFlag {
    Read,
    Archived,
}

impl NotificationFlag {
    pub fn column(&self) -> &'static str {
        match self {
            NotificationFlag::Read => "read",
            NotificationFlag::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub level: NotificationLevel,
    pub module_id: String,
    #[sqlx(rename = "module_icon")]
    pub icon: String,
    #[sqlx(rename = "module_name")]
    pub name: String,
    #[sqlx(rename = "redirect_url")]
    pub url: String,
    #[sqlx(rename = "created_on")]
    pub created_at: DateTime<Utc>,
    /// Only meaningful on the creation event; never persisted.
    #[sqlx(skip)]
    #[serde(default)]
    pub sound: bool,
    pub read: bool,
    pub archived: bool,
}

/// A fully normalized row ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub id: Uuid,
    pub message: String,
    pub level: NotificationLevel,
    pub module_id: String,
    pub icon: String,
    pub name: String,
    pub url: String,
}
