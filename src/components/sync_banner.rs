//! Sync Banner Component
//!
//! Visible only while the live subscription is not delivering.

use leptos::prelude::*;

use todo_sync::SyncStatus;

use crate::context::AppContext;
use crate::store::TodoStateStoreFields;

#[component]
pub fn SyncBanner() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;
    let local_mode = ctx.local_mode;

    view! {
        {local_mode.then(|| view! {
            <p class="text-xs text-gray-400 mb-2">"本機模式：未設定資料庫，資料不會保存"</p>
        })}
        {move || match store.status().get() {
            SyncStatus::Connecting | SyncStatus::Live => None,
            SyncStatus::Reconnecting { attempt } => Some(view! {
                <p class="text-sm text-amber-600 mb-2">
                    {format!("連線中斷，正在重新連線（第 {} 次）…", attempt)}
                </p>
            }.into_any()),
            SyncStatus::Stopped => Some(view! {
                <p class="text-sm text-red-600 mb-2">"無法同步，請重新整理頁面"</p>
            }.into_any()),
        }}
    }
}
