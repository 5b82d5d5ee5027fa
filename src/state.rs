use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::models::ChangeEvent;
use crate::services::registry::ClientRegistry;
use crate::services::session::Session;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    /// Row-level change feed for bookings; every successful mutation
    /// publishes here. Subscribers: the registry reconciler and the SSE
    /// endpoint.
    pub changes_tx: broadcast::Sender<ChangeEvent>,
    pub registry: Mutex<ClientRegistry>,
    pub session: Mutex<Session>,
}
