//! Firestore-backed remote collection

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use todo_sync::{
    CollectionError, CollectionResult, FirebaseOptions, Item, ItemId, NewItem, Query, RawItemFields, RemoteCollection, Subscription,
    SubscriptionId,
};

use super::bindings::{self, CollectionReference, DocumentReference, QueryDocumentSnapshot, QuerySnapshot};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotOptions {
    /// Pending server timestamps read as local estimates instead of null
    server_timestamps: &'static str,
}

#[derive(Serialize)]
struct CompletedPatch {
    completed: bool,
}

/// A registered `onSnapshot` listener. The closures must outlive the JS
/// registration, so they are dropped only after `detach` has run.
struct Listener {
    detach: Function,
    _on_next: Closure<dyn FnMut(QuerySnapshot)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

pub struct FirestoreCollection {
    collection: CollectionReference,
    listeners: RefCell<HashMap<SubscriptionId, Listener>>,
    next_subscription: Cell<u64>,
}

impl FirestoreCollection {
    /// Initialize the Firebase app and bind the named collection
    pub fn connect(options: &FirebaseOptions, name: &str) -> CollectionResult<Self> {
        let js_options = serde_wasm_bindgen::to_value(options)
            .map_err(|e| CollectionError::from_code("invalid-argument", e.to_string()))?;
        let app = bindings::initialize_app(&js_options).map_err(to_collection_error)?;
        let collection = app.firestore().collection(name);

        log::info!("bound collection `{}` in project {}", name, options.project_id);
        Ok(Self {
            collection,
            listeners: RefCell::new(HashMap::new()),
            next_subscription: Cell::new(0),
        })
    }

    fn document(&self, id: &ItemId) -> DocumentReference {
        self.collection.doc(id.as_str())
    }
}

#[async_trait(?Send)]
impl RemoteCollection for FirestoreCollection {
    async fn insert(&self, item: NewItem) -> CollectionResult<ItemId> {
        // Built by hand: the timestamp sentinel is a JS object serde cannot produce
        let data = Object::new();
        set_field(&data, "text", &JsValue::from_str(&item.text))?;
        set_field(&data, "completed", &JsValue::FALSE)?;
        set_field(&data, "createdAt", &bindings::server_timestamp())?;

        let doc_ref = JsFuture::from(self.collection.add(&data))
            .await
            .map_err(to_collection_error)?;
        Ok(ItemId::new(doc_ref.unchecked_into::<DocumentReference>().id()))
    }

    async fn set_completed(&self, id: &ItemId, completed: bool) -> CollectionResult<()> {
        let patch = serde_wasm_bindgen::to_value(&CompletedPatch { completed })
            .map_err(|e| CollectionError::from_code("invalid-argument", e.to_string()))?;
        JsFuture::from(self.document(id).update(&patch))
            .await
            .map_err(to_collection_error)?;
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> CollectionResult<()> {
        JsFuture::from(self.document(id).delete())
            .await
            .map_err(to_collection_error)?;
        Ok(())
    }

    fn subscribe(&self, query: &Query) -> CollectionResult<Subscription> {
        let id = SubscriptionId(self.next_subscription.get() + 1);
        self.next_subscription.set(id.0);

        let (sender, receiver) = mpsc::unbounded();
        let next_sender = sender.clone();

        let on_next = Closure::<dyn FnMut(QuerySnapshot)>::new(move |snapshot: QuerySnapshot| {
            let items: Vec<Item> = snapshot
                .docs()
                .iter()
                .map(|doc| decode_document(&doc.unchecked_into()))
                .collect();
            let _ = next_sender.unbounded_send(Ok(items));
        });
        // Firestore never calls a listener again after reporting an error
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
            let _ = sender.unbounded_send(Err(to_collection_error(err)));
            sender.close_channel();
        });

        let detach = self
            .collection
            .order_by(query.order_by(), query.direction())
            .on_snapshot(&on_next, &on_error);

        self.listeners.borrow_mut().insert(
            id,
            Listener { detach, _on_next: on_next, _on_error: on_error },
        );
        Ok(Subscription { id, snapshots: receiver.boxed_local() })
    }

    fn unsubscribe(&self, id: SubscriptionId) -> CollectionResult<()> {
        let listener = self
            .listeners
            .borrow_mut()
            .remove(&id)
            .ok_or(CollectionError::UnknownSubscription(id.0))?;
        listener
            .detach
            .call0(&JsValue::NULL)
            .map_err(to_collection_error)?;
        Ok(())
    }
}

fn set_field(target: &Object, key: &str, value: &JsValue) -> CollectionResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(to_collection_error)
}

/// Decode one document. Missing or mistyped fields are handled per field by
/// `RawItemFields`; only a document without a data object lands in the fallback.
fn decode_document(doc: &QueryDocumentSnapshot) -> Item {
    let id = ItemId::new(doc.doc_id());
    let options = serde_wasm_bindgen::to_value(&SnapshotOptions { server_timestamps: "estimate" })
        .unwrap_or(JsValue::UNDEFINED);
    let data = doc.data(&options);

    // Timestamps arrive as objects; flatten to epoch millis before serde sees them
    let created_at = Reflect::get(&data, &JsValue::from_str("createdAt"))
        .ok()
        .and_then(|value| timestamp_millis(&value));
    let _ = Reflect::set(
        &data,
        &JsValue::from_str("createdAt"),
        &created_at.map(JsValue::from_f64).unwrap_or(JsValue::NULL),
    );

    let fields = match serde_wasm_bindgen::from_value::<RawItemFields>(data) {
        Ok(fields) => fields,
        Err(err) => {
            log::warn!("document {} has no readable data: {}", id, err);
            RawItemFields { created_at: created_at.map(|ms| ms as i64), ..Default::default() }
        }
    };
    Item::from_fields(id, fields)
}

fn timestamp_millis(value: &JsValue) -> Option<f64> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let to_millis = Reflect::get(value, &JsValue::from_str("toMillis"))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    to_millis.call0(value).ok()?.as_f64().map(f64::round)
}

/// Map a `FirebaseError` (or anything else thrown) to a collection error
fn to_collection_error(err: JsValue) -> CollectionError {
    let text_field = |name: &str| {
        Reflect::get(&err, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_string())
    };
    let code = text_field("code").unwrap_or_else(|| "unknown".to_string());
    let message = text_field("message").unwrap_or_else(|| format!("{:?}", err));
    CollectionError::from_code(code.trim_start_matches("firestore/"), message)
}
