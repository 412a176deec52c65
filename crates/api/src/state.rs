use std::sync::Arc;

use limacentro_core::presence::PresenceTracker;
use limacentro_notify::EventBus;

use crate::auth::provider::IdentityProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: limacentro_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-process presence tracker backing the online counter.
    pub presence: Arc<PresenceTracker>,
    /// Event bus for listing lifecycle notifications.
    pub event_bus: EventBus,
    /// Identity token verifier (swapped for a static one in tests).
    pub identity: Arc<dyn IdentityProvider>,
}
