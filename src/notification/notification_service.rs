use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::errors::BroadcastStreamRecvError, StreamExt};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    notification_dto::CreateNotificationRequest,
    notification_models::{NewNotification, Notification, NotificationFlag, NotificationLevel},
    notification_store::{NotificationStore, INBOX_LIMIT},
};
use crate::{
    error::Result,
    events::{BusEvent, EventBus},
    module::{Caller, ModuleRegistry},
};

/// Business logic for the notification center. Cheap to clone; every clone
/// shares the same store, registry and bus.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    modules: ModuleRegistry,
    bus: EventBus,
    log_notifications: bool,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        modules: ModuleRegistry,
        bus: EventBus,
        log_notifications: bool,
    ) -> Self {
        Self {
            store,
            modules,
            bus,
            log_notifications,
        }
    }

    /// Validates, attributes and stores a notification, then announces it on
    /// `notifications.new`. Nothing is written when validation fails.
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateNotificationRequest,
    ) -> Result<Notification> {
        let content = request.content()?;
        let level = request.level();
        let attribution = self.modules.resolve(caller);

        let new_notification = NewNotification {
            id: Uuid::new_v4(),
            message: content.message,
            level,
            module_id: attribution.module_id,
            icon: attribution.icon,
            name: attribution.name,
            url: content.url.unwrap_or(attribution.default_url),
        };

        let mut notification = self.store.insert(&new_notification).await?;
        notification.sound = request.sound;

        if self.log_notifications {
            log_notification(&notification);
        }

        self.bus.publish(BusEvent::New(notification.clone()));

        Ok(notification)
    }

    #[deprecated(note = "use `create`")]
    pub async fn send(
        &self,
        caller: &Caller,
        request: CreateNotificationRequest,
    ) -> Result<Notification> {
        self.create(caller, request).await
    }

    pub async fn get_inbox(&self) -> Result<Vec<Notification>> {
        self.store.find_by_archived(false, INBOX_LIMIT).await
    }

    #[deprecated(note = "use `get_inbox`")]
    pub async fn load(&self) -> Result<Vec<Notification>> {
        self.get_inbox().await
    }

    pub async fn get_archived(&self) -> Result<Vec<Notification>> {
        self.store.find_by_archived(true, INBOX_LIMIT).await
    }

    pub async fn archive(&self, id: Uuid) -> Result<()> {
        self.store.set_flag(id, NotificationFlag::Archived).await?;
        Ok(())
    }

    pub async fn archive_all(&self) -> Result<()> {
        let archived = self.store.set_flag_all(NotificationFlag::Archived).await?;
        info!("Archived {} notification(s)", archived);
        Ok(())
    }

    pub async fn mark_as_read(&self, id: Uuid) -> Result<()> {
        self.store.set_flag(id, NotificationFlag::Read).await?;
        Ok(())
    }

    pub async fn mark_all_as_read(&self) -> Result<()> {
        let read = self.store.set_flag_all(NotificationFlag::Read).await?;
        info!("Marked {} notification(s) as read", read);
        Ok(())
    }

    /// Re-reads the inbox and broadcasts it on `notifications.all`.
    pub async fn publish_inbox(&self) -> Result<()> {
        let inbox = self.get_inbox().await?;
        self.bus.publish(BusEvent::Inbox(inbox));
        Ok(())
    }

    /// Applies one bus request and re-broadcasts the full inbox.
    pub async fn handle_event(&self, event: BusEvent) -> Result<()> {
        match event {
            BusEvent::RequestAll => {}
            BusEvent::RequestRead(id) => self.mark_as_read(id).await?,
            BusEvent::RequestReadAll => self.mark_all_as_read().await?,
            BusEvent::RequestTrashAll => self.archive_all().await?,
            BusEvent::RequestCreate(payload) => {
                self.create(&payload.caller, payload.request).await?;
            }
            BusEvent::New(_) | BusEvent::Inbox(_) => return Ok(()),
        }

        self.publish_inbox().await
    }

    /// Subscribes to the bus and serves requests until the task is aborted.
    /// The subscription exists once this returns, so nothing published
    /// afterwards is missed.
    pub fn spawn_listener(&self) -> JoinHandle<()> {
        let service = self.clone();
        let mut events = self.bus.stream();
        info!(
            "Notification listener subscribed ({} subscriber(s) on the bus)",
            self.bus.subscriber_count()
        );

        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) if event.is_request() => {
                        let topic = event.topic();
                        if let Err(e) = service.handle_event(event).await {
                            error!("Error handling {}: {:?}", topic, e);
                        }
                    }
                    Ok(_) => {}
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!("Notification listener lagged, skipped {} event(s)", skipped);
                    }
                }
            }

            info!("Notification listener stopped");
        })
    }
}

fn log_notification(notification: &Notification) {
    let module = notification.module_id.as_str();
    let message = notification.message.as_str();

    match notification.level {
        NotificationLevel::Error => error!(module = %module, "{}", message),
        NotificationLevel::Warning => warn!(module = %module, "{}", message),
        // there is no "success" severity in tracing
        NotificationLevel::Info | NotificationLevel::Success => info!(module = %module, "{}", message),
    }
}
