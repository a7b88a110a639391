//! New Todo Form Component
//!
//! Multi-line entry with a submit button. Enter submits, Shift+Enter adds a
//! newline.

use leptos::prelude::*;
use leptos::task::spawn_local;

use todo_sync::{classify_key, EntryKey};

use crate::context::AppContext;

#[component]
pub fn NewTodoForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (new_text, set_new_text) = signal(String::new());
    let input_ref = NodeRef::<leptos::html::Textarea>::new();

    // Input is cleared only once the write is acknowledged
    let submit = move || {
        let text = new_text.get_untracked();
        let controller = ctx.controller();
        spawn_local(async move {
            if let Ok(Some(_)) = controller.create(&text).await {
                set_new_text.set(String::new());
                if let Some(input) = input_ref.get_untracked() {
                    let _ = input.focus();
                }
            }
        });
    };

    view! {
        <div class="flex gap-2 mb-4">
            <textarea
                node_ref=input_ref
                class="flex-1 border rounded px-3 py-2 resize-none"
                placeholder="輸入待辦事項..."
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if classify_key(&ev.key(), ev.shift_key(), ev.is_composing()) == EntryKey::Submit {
                        ev.prevent_default();
                        submit();
                    }
                }
            ></textarea>
            <button
                class="bg-blue-500 text-white rounded px-4 py-2 hover:bg-blue-600"
                on:click=move |_| submit()
            >
                "新增"
            </button>
        </div>
    }
}
