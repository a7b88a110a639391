//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use todo_sync::{ListController, RemoteCollection};

use crate::store::TodoStore;

pub type Controller = ListController<dyn RemoteCollection>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Snapshot-derived state
    pub store: TodoStore,
    /// Write side; holds an `Rc`, so it lives in local storage
    controller: StoredValue<Controller, LocalStorage>,
    /// Running against the in-memory collection
    pub local_mode: bool,
}

impl AppContext {
    pub fn new(store: TodoStore, controller: Controller, local_mode: bool) -> Self {
        Self {
            store,
            controller: StoredValue::new_local(controller),
            local_mode,
        }
    }

    /// A handle for one async request
    pub fn controller(&self) -> Controller {
        self.controller.get_value()
    }
}
