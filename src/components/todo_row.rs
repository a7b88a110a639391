//! Todo Row Component
//!
//! One item: checkbox, text, delete button.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use todo_sync::Item;

use crate::context::AppContext;

#[component]
pub fn TodoRow(item: Item) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let id = item.id.clone();
    let completed = item.completed;
    let text = item.text.clone();
    let created = item.created_label().unwrap_or_default();

    view! {
        <li class="flex items-center justify-between border rounded px-3 py-2" title=created>
            <div class="flex items-center gap-2">
                <input
                    type="checkbox"
                    prop:checked=completed
                    on:change=move |ev| {
                        // Keep showing the synced value until the next snapshot
                        if let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) {
                            input.set_checked(completed);
                        }
                        let controller = ctx.controller();
                        let item = item.clone();
                        spawn_local(async move {
                            let _ = controller.toggle(&item).await;
                        });
                    }
                />
                <span class=if completed {
                    "whitespace-pre-wrap line-through text-gray-400"
                } else {
                    "whitespace-pre-wrap"
                }>{text}</span>
            </div>
            <button
                class="text-sm text-red-500 hover:text-red-600"
                on:click=move |_| {
                    let controller = ctx.controller();
                    let id = id.clone();
                    spawn_local(async move {
                        let _ = controller.delete(&id).await;
                    });
                }
            >
                "🗑️"
            </button>
        </li>
    }
}
