//! Firebase JS SDK Bindings
//!
//! Imports from the namespaced (compat) SDK that `index.html` loads as the
//! global `firebase`.

use js_sys::{Array, Function, Promise};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    pub type App;

    #[wasm_bindgen(catch, js_namespace = firebase, js_name = initializeApp)]
    pub fn initialize_app(options: &JsValue) -> Result<App, JsValue>;

    #[wasm_bindgen(method)]
    pub fn firestore(this: &App) -> Firestore;

    pub type Firestore;

    #[wasm_bindgen(method)]
    pub fn collection(this: &Firestore, path: &str) -> CollectionReference;

    pub type CollectionReference;

    #[wasm_bindgen(method)]
    pub fn add(this: &CollectionReference, data: &JsValue) -> Promise;

    #[wasm_bindgen(method)]
    pub fn doc(this: &CollectionReference, id: &str) -> DocumentReference;

    #[wasm_bindgen(method, js_name = orderBy)]
    pub fn order_by(this: &CollectionReference, field: &str, direction: &str) -> FirestoreQuery;

    pub type FirestoreQuery;

    /// Returns the function that detaches the listener
    #[wasm_bindgen(method, js_name = onSnapshot)]
    pub fn on_snapshot(
        this: &FirestoreQuery,
        on_next: &Closure<dyn FnMut(QuerySnapshot)>,
        on_error: &Closure<dyn FnMut(JsValue)>,
    ) -> Function;

    pub type DocumentReference;

    #[wasm_bindgen(method, getter)]
    pub fn id(this: &DocumentReference) -> String;

    #[wasm_bindgen(method)]
    pub fn update(this: &DocumentReference, data: &JsValue) -> Promise;

    #[wasm_bindgen(method)]
    pub fn delete(this: &DocumentReference) -> Promise;

    pub type QuerySnapshot;

    #[wasm_bindgen(method, getter)]
    pub fn docs(this: &QuerySnapshot) -> Array;

    pub type QueryDocumentSnapshot;

    #[wasm_bindgen(method, getter, js_name = id)]
    pub fn doc_id(this: &QueryDocumentSnapshot) -> String;

    #[wasm_bindgen(method)]
    pub fn data(this: &QueryDocumentSnapshot, options: &JsValue) -> JsValue;

    /// Sentinel the server replaces with its own clock
    #[wasm_bindgen(js_namespace = ["firebase", "firestore", "FieldValue"], js_name = serverTimestamp)]
    pub fn server_timestamp() -> JsValue;
}
