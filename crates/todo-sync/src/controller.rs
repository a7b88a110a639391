//! List Controller
//!
//! Turns user intent into single-document writes. Nothing is applied locally;
//! the rendered list changes only when the next snapshot arrives.

use std::rc::Rc;

use crate::collection::{CollectionResult, RemoteCollection};
use crate::domain::{Item, ItemId, NewItem};

pub struct ListController<C: RemoteCollection + ?Sized> {
    collection: Rc<C>,
}

impl<C: RemoteCollection + ?Sized> Clone for ListController<C> {
    fn clone(&self) -> Self {
        Self { collection: Rc::clone(&self.collection) }
    }
}

impl<C: RemoteCollection + ?Sized> ListController<C> {
    pub fn new(collection: Rc<C>) -> Self {
        Self { collection }
    }

    /// Insert the trimmed text as a new item.
    ///
    /// Blank input is ignored without touching the collection: `Ok(None)`.
    pub async fn create(&self, text: &str) -> CollectionResult<Option<ItemId>> {
        let Some(new_item) = NewItem::from_input(text) else {
            log::debug!("ignoring blank input");
            return Ok(None);
        };

        let id = self.collection.insert(new_item).await.map_err(|err| {
            log::error!("create failed: {}", err);
            err
        })?;
        log::info!("created item {}", id);
        Ok(Some(id))
    }

    /// Flip `completed` on the remote record. Returns the value written.
    pub async fn toggle(&self, item: &Item) -> CollectionResult<bool> {
        let completed = !item.completed;
        self.collection
            .set_completed(&item.id, completed)
            .await
            .map_err(|err| {
                log::error!("toggle of {} failed: {}", item.id, err);
                err
            })?;
        log::debug!("item {} completed={}", item.id, completed);
        Ok(completed)
    }

    /// Hard delete, no confirmation
    pub async fn delete(&self, id: &ItemId) -> CollectionResult<()> {
        self.collection.delete(id).await.map_err(|err| {
            log::error!("delete of {} failed: {}", id, err);
            err
        })?;
        log::info!("deleted item {}", id);
        Ok(())
    }
}
