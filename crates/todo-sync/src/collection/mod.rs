//! Collection Layer
//!
//! Remote collection abstraction, live queries and the in-memory implementation.

mod error;
mod memory;
mod query;
mod traits;

pub use error::{CollectionError, CollectionResult};
pub use memory::MemoryCollection;
pub use query::Query;
pub use traits::{RemoteCollection, SharedCollection, SnapshotStream, Subscription, SubscriptionId};
