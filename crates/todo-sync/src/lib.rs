//! Live To-Do Core
//!
//! Layered like the page that uses it:
//! - domain: the item entity and its ordering
//! - collection: the remote collection seam and an in-memory implementation
//! - sync: the subscription-owning adapter and its reconnecting session
//! - controller: create / toggle / delete requests
//! - entry, config: input handling and startup configuration

pub mod collection;
pub mod config;
pub mod controller;
pub mod domain;
pub mod entry;
pub mod sync;

pub use collection::{
    CollectionError, CollectionResult, MemoryCollection, Query, RemoteCollection, SharedCollection,
    Subscription, SubscriptionId,
};
pub use config::{AppConfig, ConfigError, FirebaseOptions};
pub use controller::ListController;
pub use domain::{Item, ItemId, NewItem, RawItemFields, Timestamp};
pub use entry::{classify_key, EntryKey};
pub use sync::{
    teardown_pair, ReconnectPolicy, SessionEnd, SyncAdapter, SyncError, SyncEvent, SyncSession, SyncStatus,
    Teardown, TeardownHandle,
};
