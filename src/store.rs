//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_sync::{Item, SyncStatus};

/// State derived from the live subscription
#[derive(Clone, Debug, Store)]
pub struct TodoState {
    /// Latest full snapshot, newest first
    pub items: Vec<Item>,
    /// Connection state of the subscription
    pub status: SyncStatus,
}

impl TodoState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            status: SyncStatus::Connecting,
        }
    }
}

/// Shown in place of the list when there are no items
pub const EMPTY_MESSAGE: &str = "目前沒有待辦，先新增一個吧！";

/// Whether the list renders rows; otherwise it renders [`EMPTY_MESSAGE`]
pub fn shows_rows(items: &[Item]) -> bool {
    !items.is_empty()
}

/// Type alias for the store
pub type TodoStore = Store<TodoState>;

/// Replace the rendered list with a snapshot
pub fn store_replace_items(store: &TodoStore, items: Vec<Item>) {
    *store.items().write() = items;
}

pub fn store_set_status(store: &TodoStore, status: SyncStatus) {
    *store.status().write() = status;
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_sync::{ItemId, Timestamp};

    fn make_item(id: &str) -> Item {
        Item {
            id: ItemId::new(id),
            text: format!("Item {}", id),
            completed: false,
            created_at: Some(Timestamp::from_millis(1)),
        }
    }

    #[test]
    fn test_initial_state_shows_empty_message() {
        let state = TodoState::new();
        assert!(!shows_rows(&state.items));
        assert_eq!(state.status, SyncStatus::Connecting);
    }

    #[test]
    fn test_items_replace_empty_message() {
        let state = TodoState {
            items: vec![make_item("a")],
            ..TodoState::new()
        };
        assert!(shows_rows(&state.items));
    }

    #[test]
    fn test_list_emptied_by_delete_shows_message_again() {
        let mut items = vec![make_item("a"), make_item("b")];
        items.retain(|item| item.id.as_str() == "b");
        assert!(shows_rows(&items));
        items.clear();
        assert!(!shows_rows(&items));
    }
}
