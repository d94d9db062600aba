use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::module::Caller;
use crate::notification::{CreateNotificationRequest, Notification};

/// Everything that travels over the bus. Serialized as
/// `{"topic": "...", "payload": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum BusEvent {
    // Requests handled by the notification service
    #[serde(rename = "notifications.getAll")]
    RequestAll,
    #[serde(rename = "notifications.read")]
    RequestRead(Uuid),
    #[serde(rename = "notifications.allRead")]
    RequestReadAll,
    #[serde(rename = "notifications.trashAll")]
    RequestTrashAll,
    #[serde(rename = "notifications.create")]
    RequestCreate(CreatePayload),

    // Broadcasts
    #[serde(rename = "notifications.new")]
    New(Notification),
    #[serde(rename = "notifications.all")]
    Inbox(Vec<Notification>),
}

impl BusEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            BusEvent::RequestAll => "notifications.getAll",
            BusEvent::RequestRead(_) => "notifications.read",
            BusEvent::RequestReadAll => "notifications.allRead",
            BusEvent::RequestTrashAll => "notifications.trashAll",
            BusEvent::RequestCreate(_) => "notifications.create",
            BusEvent::New(_) => "notifications.new",
            BusEvent::Inbox(_) => "notifications.all",
        }
    }

    /// Whether the notification service consumes this event.
    pub fn is_request(&self) -> bool {
        !matches!(self, BusEvent::New(_) | BusEvent::Inbox(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayload {
    #[serde(default)]
    pub caller: Caller,
    #[serde(flatten)]
    pub request: CreateNotificationRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationLevel;
    use serde_json::json;

    #[test]
    fn test_unit_request_parses_without_payload() {
        let event: BusEvent = serde_json::from_value(json!({ "topic": "notifications.trashAll" })).unwrap();
        assert!(matches!(event, BusEvent::RequestTrashAll));
        assert!(event.is_request());
    }

    #[test]
    fn test_read_request_carries_id() {
        let id = Uuid::new_v4();
        let event: BusEvent =
            serde_json::from_value(json!({ "topic": "notifications.read", "payload": id })).unwrap();

        match event {
            BusEvent::RequestRead(read_id) => assert_eq!(read_id, id),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_create_request_defaults_to_core_caller() {
        let event: BusEvent = serde_json::from_value(json!({
            "topic": "notifications.create",
            "payload": { "message": "hi", "level": "ERROR" }
        }))
        .unwrap();

        match event {
            BusEvent::RequestCreate(payload) => {
                assert_eq!(payload.caller, Caller::Core);
                assert_eq!(payload.request.level(), NotificationLevel::Error);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_broadcast_topics() {
        let inbox = BusEvent::Inbox(vec![]);
        assert_eq!(inbox.topic(), "notifications.all");
        assert!(!inbox.is_request());

        let json = serde_json::to_value(&inbox).unwrap();
        assert_eq!(json["topic"], "notifications.all");
        assert_eq!(json["payload"], json!([]));
    }
}
