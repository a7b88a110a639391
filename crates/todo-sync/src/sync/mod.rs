//! Live Sync
//!
//! Subscription lifecycle and the derived item list.

mod adapter;
mod reconnect;
mod session;
mod teardown;

pub use adapter::{SyncAdapter, SyncError, SyncResult};
pub use reconnect::ReconnectPolicy;
pub use session::{SessionEnd, SyncEvent, SyncSession, SyncStatus};
pub use teardown::{teardown_pair, Teardown, TeardownHandle};
