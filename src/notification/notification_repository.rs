use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::notification_models::{NewNotification, Notification, NotificationFlag};
use super::notification_store::NotificationStore;
use crate::error::Result;

/// PostgreSQL-backed notification table.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, message, level, module_id, module_icon, module_name, redirect_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
        .bind(notification.id)
        .bind(&notification.message)
        .bind(notification.level)
        .bind(&notification.module_id)
        .bind(&notification.icon)
        .bind(&notification.name)
        .bind(&notification.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_archived(&self, archived: bool, limit: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE archived = $1
             ORDER BY created_on DESC
             LIMIT $2"
        )
        .bind(archived)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn set_flag(&self, id: Uuid, flag: NotificationFlag) -> Result<u64> {
        let sql = format!("UPDATE notifications SET {} = true WHERE id = $1", flag.column());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn set_flag_all(&self, flag: NotificationFlag) -> Result<u64> {
        let column = flag.column();
        let sql = format!("UPDATE notifications SET {0} = true WHERE {0} = false", column);
        let result = sqlx::query(&sql).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }
}
