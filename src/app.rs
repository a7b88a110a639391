//! Live To-Do App
//!
//! Root component. Owns the live sync for as long as it is mounted.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use todo_sync::{
    teardown_pair, ListController, ReconnectPolicy, SharedCollection, SyncAdapter, SyncEvent, SyncSession,
};

use crate::components::{NewTodoForm, SyncBanner, TodoList};
use crate::context::AppContext;
use crate::store::{store_replace_items, store_set_status, TodoState};

#[component]
pub fn App(
    collection: SharedCollection,
    reconnect: ReconnectPolicy,
    #[prop(optional)] local_mode: bool,
) -> impl IntoView {
    // State
    let store = Store::new(TodoState::new());

    // Provide context to all children
    provide_context(AppContext::new(store, ListController::new(collection.clone()), local_mode));

    // Subscribe once per mount; unmounting fires the teardown and releases it
    let (teardown_handle, teardown) = teardown_pair();
    on_cleanup(move || teardown_handle.fire());

    let session = SyncSession::new(SyncAdapter::new(collection), reconnect);
    spawn_local(async move {
        let end = session
            .run(
                teardown,
                move |event| match event {
                    SyncEvent::Snapshot(items) => store_replace_items(&store, items),
                    SyncEvent::Status(status) => store_set_status(&store, status),
                },
                gloo_timers::future::sleep,
            )
            .await;
        log::info!("live sync ended: {:?}", end);
    });

    view! {
        <div class="max-w-md mx-auto mt-20 bg-white p-6 rounded-xl shadow-md">
            <h1 class="text-2xl font-bold mb-4 text-center">"我的待辦清單"</h1>

            <SyncBanner />

            <NewTodoForm />

            <TodoList />
        </div>
    }
}
