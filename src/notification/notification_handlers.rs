use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    events::BusEvent,
    middleware::CallerModule,
    state::AppState,
};
use super::{
    notification_dto::CreateNotificationRequest,
    notification_models::Notification,
};

/// Get the inbox (non-archived notifications, newest first)
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Up to 100 inbox notifications", body = Vec<Notification>)
    ),
    tag = "notifications"
)]
pub async fn get_inbox(State(state): State<AppState>) -> Result<Json<Vec<Notification>>> {
    let notifications = state.notification_service.get_inbox().await?;

    Ok(Json(notifications))
}

/// Get archived notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications/archived",
    responses(
        (status = 200, description = "Up to 100 archived notifications", body = Vec<Notification>)
    ),
    tag = "notifications"
)]
pub async fn get_archived(State(state): State<AppState>) -> Result<Json<Vec<Notification>>> {
    let notifications = state.notification_service.get_archived().await?;

    Ok(Json(notifications))
}

/// Create a notification
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationRequest,
    params(
        ("X-Module-Id" = Option<String>, Header, description = "Module the notification is sent on behalf of")
    ),
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 400, description = "Invalid input")
    ),
    tag = "notifications"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    CallerModule(caller): CallerModule,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<impl IntoResponse> {
    let notification = state
        .notification_service
        .create(&caller, payload)
        .await?;

    state.notification_service.publish_inbox().await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

/// Mark one notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Marked as read (unknown ids are ignored)")
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.notification_service.mark_as_read(notification_id).await?;
    state.notification_service.publish_inbox().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Mark every notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/read-all",
    responses(
        (status = 204, description = "All notifications marked as read")
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(State(state): State<AppState>) -> Result<StatusCode> {
    state.notification_service.mark_all_as_read().await?;
    state.notification_service.publish_inbox().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Archive one notification
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/archive",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Archived (unknown ids are ignored)")
    ),
    tag = "notifications"
)]
pub async fn archive_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.notification_service.archive(notification_id).await?;
    state.notification_service.publish_inbox().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Archive every notification
#[utoipa::path(
    patch,
    path = "/api/notifications/archive-all",
    responses(
        (status = 204, description = "All notifications archived")
    ),
    tag = "notifications"
)]
pub async fn archive_all(State(state): State<AppState>) -> Result<StatusCode> {
    state.notification_service.archive_all().await?;
    state.notification_service.publish_inbox().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Publish a request event onto the event bus
///
/// Body: `{"topic": "notifications.read", "payload": "<id>"}`. Only request
/// topics are accepted; broadcasts originate from the service itself.
#[utoipa::path(
    post,
    path = "/api/notifications/events",
    responses(
        (status = 202, description = "Event published"),
        (status = 400, description = "Unknown or non-request topic")
    ),
    tag = "notifications"
)]
pub async fn publish_event(
    State(state): State<AppState>,
    Json(event): Json<BusEvent>,
) -> Result<StatusCode> {
    if !event.is_request() {
        return Err(AppError::BadRequest(format!(
            "{} cannot be published by clients",
            event.topic()
        )));
    }

    let receivers = state.bus.publish(event);
    tracing::debug!("Client event delivered to {} subscriber(s)", receivers);

    Ok(StatusCode::ACCEPTED)
}
