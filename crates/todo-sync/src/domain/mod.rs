//! Domain Layer
//!
//! The single entity of the to-do list and its ordering rules.

mod item;

pub use item::{is_newest_first, newest_first, Item, ItemId, NewItem, RawItemFields, Timestamp};
