//! Sync Adapter
//!
//! Owns the one live subscription of a view and the list derived from it.
//! Every snapshot replaces the list wholesale; there is no merge step.

use std::rc::Rc;

use futures::StreamExt;
use thiserror::Error;

use crate::collection::{CollectionError, Query, RemoteCollection, SnapshotStream, Subscription, SubscriptionId};
use crate::domain::Item;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("sync adapter is already active")]
    AlreadyActive,
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl SyncError {
    /// Whether re-activating later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::AlreadyActive => false,
            SyncError::Collection(err) => err.is_transient(),
        }
    }
}

struct ActiveSubscription {
    id: SubscriptionId,
    snapshots: SnapshotStream,
}

/// Live mirror of the remote collection.
///
/// Dropping the adapter releases its subscription.
pub struct SyncAdapter<C: RemoteCollection + ?Sized> {
    collection: Rc<C>,
    query: Query,
    active: Option<ActiveSubscription>,
    items: Vec<Item>,
}

impl<C: RemoteCollection + ?Sized> SyncAdapter<C> {
    pub fn new(collection: Rc<C>) -> Self {
        Self {
            collection,
            query: Query::newest_first(),
            active: None,
            items: Vec::new(),
        }
    }

    /// Open the subscription. Fails without side effects if one is already open.
    pub fn activate(&mut self) -> SyncResult<SubscriptionId> {
        if self.active.is_some() {
            return Err(SyncError::AlreadyActive);
        }

        let Subscription { id, snapshots } = self.collection.subscribe(&self.query)?;
        log::info!(
            "subscription {} opened ({} {})",
            id,
            self.query.order_by(),
            self.query.direction()
        );
        self.active = Some(ActiveSubscription { id, snapshots });
        Ok(id)
    }

    /// The current derived list
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Wait for the next snapshot and make it the local list.
    ///
    /// Returns `None` when inactive or when the remote side ended the
    /// subscription. A failed or ended subscription is released before this
    /// returns.
    pub async fn next_snapshot(&mut self) -> Option<SyncResult<&[Item]>> {
        let active = self.active.as_mut()?;
        let event = active.snapshots.next().await;

        match event {
            Some(Ok(mut items)) => {
                self.query.sort(&mut items);
                self.items = items;
                log::debug!("snapshot with {} items", self.items.len());
                Some(Ok(&self.items))
            }
            Some(Err(err)) => {
                log::warn!("subscription failed: {}", err);
                self.deactivate();
                Some(Err(err.into()))
            }
            None => {
                log::warn!("subscription closed by remote");
                self.deactivate();
                None
            }
        }
    }

    /// Release the subscription. Returns whether one was open.
    pub fn deactivate(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };

        match self.collection.unsubscribe(active.id) {
            Ok(()) => log::info!("subscription {} released", active.id),
            // Already gone on the remote side
            Err(err) => log::debug!("releasing subscription {}: {}", active.id, err),
        }
        true
    }
}

impl<C: RemoteCollection + ?Sized> Drop for SyncAdapter<C> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
