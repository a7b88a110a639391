//! Live To-Do Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod firestore;
mod logging;
mod store;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Info);

    let backend = config::backend();
    log::info!("starting (local mode: {})", backend.local_mode);

    mount_to_body(move || {
        view! {
            <App
                collection=backend.collection
                reconnect=backend.reconnect
                local_mode=backend.local_mode
            />
        }
    });
}
