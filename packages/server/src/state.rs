use std::sync::Arc;

use common::{Accounts, DocumentStore, Family, Images, Reconciler};

use crate::config::AppConfig;
use crate::script::GenerationScript;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub generate: Reconciler,
    pub images: Images,
    pub accounts: Accounts,
    pub script: GenerationScript,
}

impl AppState {
    /// Wire every record family to the one process-wide store handle.
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            generate: Reconciler::new(store.clone(), Family::generation_requests()),
            images: Images::new(store.clone()),
            accounts: Accounts::new(store),
            script: GenerationScript::from_config(&config.trigger),
            config,
        }
    }
}
