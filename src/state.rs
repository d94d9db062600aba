use anyhow::Context;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{events::EventBus, notification::NotificationService};

#[derive(Clone)]
pub struct AppState {
    pub bus: EventBus,
    pub notification_service: NotificationService,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it notifications live in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub modules_file: Option<PathBuf>,
    pub log_notifications: bool,
    pub event_bus_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: 5,
            host: "127.0.0.1".to_string(),
            port: 3000,
            modules_file: None,
            log_notifications: true,
            event_bus_capacity: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let event_bus_capacity =
            parse_or(&non_empty, "EVENT_BUS_CAPACITY", defaults.event_bus_capacity)?;
        anyhow::ensure!(event_bus_capacity > 0, "EVENT_BUS_CAPACITY must be greater than zero");

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            db_max_connections: parse_or(&non_empty, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: parse_or(&non_empty, "PORT", defaults.port)?,
            modules_file: non_empty("MODULES_FILE").map(PathBuf::from),
            log_notifications: parse_or(&non_empty, "NOTIFICATION_LOGS", defaults.log_notifications)?,
            event_bus_capacity,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid {}", key, std::any::type_name::<T>())),
        None => Ok(default),
    }
}
