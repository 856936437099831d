use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::AppError;
use crate::store::KeyValueStore;
use crate::Config;

/// Application configuration and local state, shared by every screen.
pub struct App {
    config: Arc<Config>,
    store: Arc<Mutex<KeyValueStore>>,
}

impl App {
    /// Build the application around an already loaded configuration.
    ///
    /// An unreadable state file is logged and replaced by an empty store.
    pub fn from_config(config: Config) -> Self {
        let state_path = config.state_path();
        let store = match KeyValueStore::open(&state_path) {
            Ok(store) => store,
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!("{} ({})", err, err.user_message());
                KeyValueStore::empty(&state_path)
            }
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: KeyValueStore) -> Self {
        tracing::info!("Application state at {}", config.config_dir.display());
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Shared handle to the persistent key-value state
    pub fn store(&self) -> Arc<Mutex<KeyValueStore>> {
        self.store.clone()
    }

    pub fn shutdown(&self) {
        tracing::info!("Shutting down application");
    }
}
