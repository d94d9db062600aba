use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::notification_models::{NewNotification, Notification, NotificationFlag};
use crate::error::Result;

/// Maximum number of rows returned by inbox and archive queries.
pub const INBOX_LIMIT: i64 = 100;

/// Persistence boundary for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Inserts one row. The store assigns the creation timestamp.
    async fn insert(&self, notification: &NewNotification) -> Result<Notification>;

    /// Rows with the given `archived` flag, newest first, at most `limit`.
    async fn find_by_archived(&self, archived: bool, limit: i64) -> Result<Vec<Notification>>;

    /// Sets `flag` on a single row. Unknown ids affect zero rows.
    async fn set_flag(&self, id: Uuid, flag: NotificationFlag) -> Result<u64>;

    /// Sets `flag` on every row where it is still unset.
    async fn set_flag_all(&self, flag: NotificationFlag) -> Result<u64>;
}

/// Process-local store, kept in insertion order.
#[derive(Clone, Default)]
pub struct MemoryNotificationStore {
    rows: Arc<RwLock<Vec<Notification>>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_flag(notification: &mut Notification, flag: NotificationFlag) -> bool {
    let slot = match flag {
        NotificationFlag::Read => &mut notification.read,
        NotificationFlag::Archived => &mut notification.archived,
    };
    let changed = !*slot;
    *slot = true;
    changed
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification> {
        let row = Notification {
            id: notification.id,
            message: notification.message.clone(),
            level: notification.level,
            module_id: notification.module_id.clone(),
            icon: notification.icon.clone(),
            name: notification.name.clone(),
            url: notification.url.clone(),
            created_at: Utc::now(),
            sound: false,
            read: false,
            archived: false,
        };

        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn find_by_archived(&self, archived: bool, limit: i64) -> Result<Vec<Notification>> {
        let rows = self.rows.read().await;

        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.archived == archived)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn set_flag(&self, id: Uuid, flag: NotificationFlag) -> Result<u64> {
        let mut rows = self.rows.write().await;

        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                apply_flag(row, flag);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn set_flag_all(&self, flag: NotificationFlag) -> Result<u64> {
        let mut rows = self.rows.write().await;

        let mut changed = 0;
        for row in rows.iter_mut() {
            if apply_flag(row, flag) {
                changed += 1;
            }
        }

        Ok(changed)
    }
}
