use crate::{
    error::AppError,
    notification::{self, CreateNotificationRequest, Notification, NotificationLevel},
    state::AppState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        notification::notification_handlers::get_inbox,
        notification::notification_handlers::get_archived,
        notification::notification_handlers::create_notification,
        notification::notification_handlers::mark_notification_read,
        notification::notification_handlers::mark_all_read,
        notification::notification_handlers::archive_notification,
        notification::notification_handlers::archive_all,
        notification::notification_handlers::publish_event,
    ),
    components(
        schemas(
            CreateNotificationRequest,
            Notification,
            NotificationLevel,
        )
    ),
    tags(
        (name = "notifications", description = "Notification center endpoints")
    )
)]
struct ApiDoc;

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let notification_routes = Router::new()
        .route(
            "/",
            get(notification::get_inbox).post(notification::create_notification),
        )
        .route("/archived", get(notification::get_archived))
        .route("/events", post(notification::publish_event))
        .route("/read-all", patch(notification::mark_all_read))
        .route("/archive-all", patch(notification::archive_all))
        .route("/:id/read", patch(notification::mark_notification_read))
        .route("/:id/archive", patch(notification::archive_notification));

    let api_routes = Router::new().nest("/notifications", notification_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{BusEvent, EventBus},
        middleware::MODULE_HEADER,
        module::{ModuleInfo, ModuleRegistry},
        notification::{MemoryNotificationStore, NotificationService},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::{path::PathBuf, sync::Arc};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let bus = EventBus::new(64);
        let modules = ModuleRegistry::new(vec![ModuleInfo {
            name: "hitl".into(),
            root_dir: PathBuf::from("/srv/bot/modules/hitl"),
            menu_icon: Some("chat".into()),
            menu_text: Some("Human in the loop".into()),
        }]);
        let notification_service = NotificationService::new(
            Arc::new(MemoryNotificationStore::new()),
            modules,
            bus.clone(),
            false,
        );

        AppState {
            bus,
            notification_service,
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_created_record() {
        let app = create_router(test_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/notifications",
                json!({ "message": "hi", "level": "bogus" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "hi");
        assert_eq!(body["level"], "info");
        assert_eq!(body["moduleId"], "botpress");
        assert_eq!(body["read"], false);
        assert_eq!(body["archived"], false);
    }

    #[tokio::test]
    async fn test_create_non_string_level_is_info() {
        let app = create_router(test_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/notifications",
                json!({ "message": "hi", "level": 5 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["level"], "info");
    }

    #[tokio::test]
    async fn test_create_uses_module_header() {
        let app = create_router(test_state());

        let mut request = json_request(
            "POST",
            "/api/notifications",
            json!({ "message": "Agent requested", "level": "Warning" }),
        );
        request
            .headers_mut()
            .insert(MODULE_HEADER, "hitl".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["moduleId"], "hitl");
        assert_eq!(body["icon"], "chat");
        assert_eq!(body["name"], "Human in the loop");
        assert_eq!(body["url"], "/modules/hitl");
        assert_eq!(body["level"], "warning");
    }

    #[tokio::test]
    async fn test_create_rejects_non_string_message() {
        let app = create_router(test_state());

        let response = app
            .oneshot(json_request("POST", "/api/notifications", json!({ "message": 12 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("string"));
    }

    #[tokio::test]
    async fn test_archive_flow() {
        let state = test_state();
        let app = create_router(state.clone());

        let created = state
            .notification_service
            .create(&Default::default(), CreateNotificationRequest::new("old news"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(empty_request(
                "PATCH",
                &format!("/api/notifications/{}/archive", created.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/notifications"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!([]));

        let response = app
            .oneshot(empty_request("GET", "/api/notifications/archived"))
            .await
            .unwrap();
        let archived = body_json(response).await;
        assert_eq!(archived[0]["id"], json!(created.id));
        assert_eq!(archived[0]["archived"], true);
    }

    #[tokio::test]
    async fn test_read_all_rebroadcasts_inbox() {
        let state = test_state();
        let mut rx = state.bus.subscribe();
        let app = create_router(state.clone());

        state
            .notification_service
            .create(&Default::default(), CreateNotificationRequest::new("unread"))
            .await
            .unwrap();

        let response = app
            .oneshot(empty_request("PATCH", "/api/notifications/read-all"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        assert!(matches!(rx.recv().await.unwrap(), BusEvent::New(_)));
        match rx.recv().await.unwrap() {
            BusEvent::Inbox(inbox) => assert!(inbox.iter().all(|n| n.read)),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publish_event_accepts_requests_only() {
        let state = test_state();
        let mut rx = state.bus.subscribe();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/notifications/events",
                json!({ "topic": "notifications.getAll" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(matches!(rx.recv().await.unwrap(), BusEvent::RequestAll));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/notifications/events",
                json!({ "topic": "notifications.all", "payload": [] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router(test_state());

        let response = app
            .oneshot(empty_request("GET", "/api/nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
