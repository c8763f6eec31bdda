use std::sync::Arc;

use tokio::sync::Mutex;

use folio_core::drafts::DraftCache;

use crate::config::ServerConfig;
use crate::service::ensure::EnsurePortfolio;
use crate::service::sessions::BuilderSessions;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus for publishing portfolio events.
    pub event_bus: Arc<folio_events::EventBus>,
    /// Single-flight guard for portfolio creation.
    pub ensure: Arc<EnsurePortfolio>,
    /// Live builder sessions with their autosave workers.
    pub sessions: Arc<BuilderSessions>,
    /// Draft-portfolio-id cache and onboarding flags.
    pub drafts: Arc<Mutex<DraftCache>>,
}

impl AppState {
    pub fn new(pool: folio_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            event_bus: Arc::new(folio_events::EventBus::default()),
            ensure: Arc::new(EnsurePortfolio::new()),
            sessions: Arc::new(BuilderSessions::new()),
            drafts: Arc::new(Mutex::new(DraftCache::new())),
        }
    }
}
