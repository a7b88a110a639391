//! Todo List Component
//!
//! Renders the latest snapshot, or the empty-state message.

use leptos::prelude::*;

use todo_sync::Item;

use crate::components::TodoRow;
use crate::context::AppContext;
use crate::store::{shows_rows, TodoStateStoreFields, EMPTY_MESSAGE};

#[component]
pub fn TodoList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;

    view! {
        <div class="mt-4">
            <Show
                when=move || store.items().with(|items| shows_rows(items))
                fallback=|| view! {
                    <p class="text-sm text-gray-500">{EMPTY_MESSAGE}</p>
                }
            >
                <ul class="space-y-2">
                    <For
                        each=move || store.items().get()
                        // Every field that can change, so an updated record re-renders
                        key=|item: &Item| (item.id.clone(), item.completed, item.text.clone())
                        children=move |item: Item| view! { <TodoRow item=item /> }
                    />
                </ul>
            </Show>
        </div>
    }
}
