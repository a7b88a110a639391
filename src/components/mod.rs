//! UI Components
//!
//! Reusable Leptos components.

mod new_todo_form;
mod sync_banner;
mod todo_list;
mod todo_row;

pub use new_todo_form::NewTodoForm;
pub use sync_banner::SyncBanner;
pub use todo_list::TodoList;
pub use todo_row::TodoRow;
