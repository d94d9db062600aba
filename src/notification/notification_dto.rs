use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::notification_models::NotificationLevel;
use crate::error::{AppError, Result};

/// Raw creation input as it arrives from the bus or over HTTP. Fields are
/// kept untyped: a non-string message is a validation failure, a non-string
/// level falls back to `info` and a non-string url counts as no url.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    #[schema(value_type = Option<String>)]
    pub message: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub url: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub level: Option<Value>,
    #[serde(default)]
    pub sound: bool,
}

impl CreateNotificationRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(Value::String(url.into()));
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(Value::String(level.into()));
        self
    }

    pub fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    pub fn level(&self) -> NotificationLevel {
        NotificationLevel::normalize(self.level.as_ref().and_then(Value::as_str))
    }

    /// Checks the message and returns the typed content. A blank url counts
    /// as no url, so the module's default applies.
    pub fn content(&self) -> Result<NotificationContent> {
        let message = match &self.message {
            Some(Value::String(message)) => message.clone(),
            Some(_) => return Err(AppError::Validation("message must be a string".into())),
            None => return Err(AppError::Validation("message is required".into())),
        };

        let content = NotificationContent {
            message,
            url: self
                .url
                .as_ref()
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        };
        content.validate()?;

        Ok(content)
    }
}

#[derive(Debug, Validate)]
pub struct NotificationContent {
    #[validate(length(min = 1))]
    pub message: String,
    pub url: Option<String>,
}
