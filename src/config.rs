//! Startup Configuration
//!
//! Reads the JSON block embedded in `index.html` and picks the collection
//! backend the view will use.

use std::rc::Rc;

use todo_sync::{AppConfig, ConfigError, MemoryCollection, ReconnectPolicy, SharedCollection};

use crate::firestore::FirestoreCollection;
use crate::logging;

/// Id of the `<script type="application/json">` element holding the config
const CONFIG_ELEMENT_ID: &str = "app-config";

/// What the view runs against
pub struct Backend {
    pub collection: SharedCollection,
    pub reconnect: ReconnectPolicy,
    /// True when no remote database is configured
    pub local_mode: bool,
}

/// Read the embedded config, if the page has one
pub fn load() -> Result<Option<AppConfig>, ConfigError> {
    let text = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());

    match text {
        Some(text) if !text.trim().is_empty() => AppConfig::from_json(&text).map(Some),
        _ => Ok(None),
    }
}

/// Connect to Firestore when configured, otherwise fall back to local mode
pub fn backend() -> Backend {
    let config = match load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::warn!("no #{} block, running in local mode", CONFIG_ELEMENT_ID);
            return local_backend();
        }
        Err(err) => {
            log::error!("config rejected: {}", err);
            return local_backend();
        }
    };

    logging::set_level(config.level_filter());
    match FirestoreCollection::connect(&config.firebase, &config.collection) {
        Ok(remote) => Backend {
            collection: Rc::new(remote),
            reconnect: config.reconnect,
            local_mode: false,
        },
        Err(err) => {
            log::error!("firebase init failed: {}", err);
            local_backend()
        }
    }
}

fn local_backend() -> Backend {
    Backend {
        collection: Rc::new(MemoryCollection::new()),
        reconnect: ReconnectPolicy::default(),
        local_mode: true,
    }
}
