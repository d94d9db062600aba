pub mod notification_models;
pub mod notification_dto;
pub mod notification_store;
pub mod notification_repository;
pub mod notification_handlers;
pub mod notification_service;

pub use notification_models::{Notification, NotificationLevel};
pub use notification_dto::CreateNotificationRequest;
pub use notification_store::{MemoryNotificationStore, NotificationStore};
pub use notification_repository::NotificationRepository;
pub use notification_handlers::{
    archive_all, archive_notification, create_notification, get_archived, get_inbox,
    mark_all_read, mark_notification_read, publish_event,
};
pub use notification_service::NotificationService;
