use crate::config::Config;
use crate::gateway::Gateway;
use crate::journal::Journal;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Gateway,
    pub journal: Arc<Mutex<Journal>>,
}

impl AppState {
    pub fn new(config: Config, gateway: Gateway) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
            journal: Arc::new(Mutex::new(Journal::new())),
        }
    }
}
