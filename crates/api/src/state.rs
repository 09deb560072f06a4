use std::sync::Arc;

use buildup_db::DbPool;
use buildup_events::EffectDispatcher;

use crate::config::ServerConfig;

/// Shared application state, cloned into every handler.
///
/// Cloning is cheap: the pool is internally reference-counted and the
/// remaining fields sit behind [`Arc`]s.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: DbPool,
    /// Server configuration (JWT secret, CORS origins, timeouts).
    pub config: Arc<ServerConfig>,
    /// Side-effect dispatcher for emails and in-app notifications.
    pub dispatcher: Arc<EffectDispatcher>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig, dispatcher: EffectDispatcher) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }
}
