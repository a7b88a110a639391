//! Firestore Binding
//!
//! The browser implementation of the remote collection.

mod bindings;
mod collection;

pub use collection::FirestoreCollection;
