mod db;
mod error;
mod events;
mod middleware;
mod module;
mod notification;
mod routes;
mod state;

use db::{create_pool, run_migrations};
use events::EventBus;
use module::ModuleRegistry;
use notification::{MemoryNotificationStore, NotificationRepository, NotificationService, NotificationStore};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notification_center=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn NotificationStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = create_pool(database_url, config.db_max_connections).await?;

            tracing::info!("Running migrations...");
            run_migrations(&db).await?;

            Arc::new(NotificationRepository::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, notifications are kept in memory only");
            Arc::new(MemoryNotificationStore::new())
        }
    };

    let modules = match &config.modules_file {
        Some(path) => ModuleRegistry::from_file(path)?,
        None => ModuleRegistry::default(),
    };
    for module in modules.modules() {
        tracing::debug!("Module {} rooted at {}", module.name, module.root_dir.display());
    }

    let bus = EventBus::new(config.event_bus_capacity);

    let notification_service = NotificationService::new(
        store,
        modules,
        bus.clone(),
        config.log_notifications,
    );

    // Serve bus requests for the lifetime of the process
    let listener_handle = notification_service.spawn_listener();

    let state = AppState {
        bus,
        notification_service,
    };

    let app = create_router(state);

    let addr = config.addr();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    listener_handle.abort();

    Ok(())
}
