use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hyperion_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<hyperion_events::EventBus>,
    /// Template renderer and SMTP sender.
    pub mailer: Arc<hyperion_events::Mailer>,
    /// HTTP client for outbound lookups (FFSU register).
    pub http: reqwest::Client,
}
