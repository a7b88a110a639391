//! End-to-end flows: controller writes observed through the sync adapter.

use std::rc::Rc;

use todo_sync::domain::is_newest_first;
use todo_sync::{Item, ListController, MemoryCollection, RemoteCollection, SharedCollection, SyncAdapter};

type Controller = ListController<dyn RemoteCollection>;
type Adapter = SyncAdapter<dyn RemoteCollection>;

fn setup() -> (Rc<MemoryCollection>, Controller, Adapter) {
    let collection = Rc::new(MemoryCollection::new());
    let shared: SharedCollection = collection.clone();
    let controller = ListController::new(shared.clone());
    let adapter = SyncAdapter::new(shared);
    (collection, controller, adapter)
}

async fn latest(adapter: &mut Adapter) -> Vec<Item> {
    adapter.next_snapshot().await.expect("subscription ended").expect("snapshot failed").to_vec()
}

fn texts(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.text.as_str()).collect()
}

#[tokio::test]
async fn test_milk_and_dog_scenario() {
    let (_collection, controller, mut adapter) = setup();
    adapter.activate().unwrap();
    assert!(latest(&mut adapter).await.is_empty());

    controller.create("Buy milk").await.unwrap();
    let snapshot = latest(&mut adapter).await;
    assert_eq!(texts(&snapshot), ["Buy milk"]);
    assert!(!snapshot[0].completed);

    controller.toggle(&snapshot[0]).await.unwrap();
    let snapshot = latest(&mut adapter).await;
    assert_eq!(texts(&snapshot), ["Buy milk"]);
    assert!(snapshot[0].completed);
    let milk = snapshot[0].id.clone();

    controller.create("Walk dog").await.unwrap();
    let snapshot = latest(&mut adapter).await;
    assert_eq!(texts(&snapshot), ["Walk dog", "Buy milk"]);

    controller.delete(&milk).await.unwrap();
    let snapshot = latest(&mut adapter).await;
    assert_eq!(texts(&snapshot), ["Walk dog"]);
}

#[tokio::test]
async fn test_newest_item_always_first() {
    let (_collection, controller, mut adapter) = setup();
    adapter.activate().unwrap();
    latest(&mut adapter).await;

    for n in 0..6 {
        let text = format!("task {}", n);
        controller.create(&text).await.unwrap();
        let snapshot = latest(&mut adapter).await;
        assert_eq!(snapshot.len(), n + 1);
        assert_eq!(snapshot[0].text, text);
        assert!(is_newest_first(&snapshot));
    }
}

#[tokio::test]
async fn test_blank_input_produces_no_snapshot_change() {
    let (collection, controller, mut adapter) = setup();
    adapter.activate().unwrap();
    latest(&mut adapter).await;

    controller.create("   ").await.unwrap();
    controller.create("real").await.unwrap();

    // The only change observed is the real item
    let snapshot = latest(&mut adapter).await;
    assert_eq!(texts(&snapshot), ["real"]);
    assert_eq!(collection.write_calls(), 1);
}

#[tokio::test]
async fn test_deleted_id_never_reappears() {
    let (collection, controller, mut adapter) = setup();
    adapter.activate().unwrap();
    latest(&mut adapter).await;

    let id = controller.create("temporary").await.unwrap().unwrap();
    latest(&mut adapter).await;
    controller.delete(&id).await.unwrap();
    controller.create("after").await.unwrap();

    for _ in 0..2 {
        let snapshot = latest(&mut adapter).await;
        assert!(snapshot.iter().all(|item| item.id != id));
    }
    assert!(collection.items().iter().all(|item| item.id != id));
}

#[tokio::test]
async fn test_two_sessions_see_each_others_writes() {
    let collection = Rc::new(MemoryCollection::new());
    let shared: SharedCollection = collection.clone();
    let mut first = SyncAdapter::new(shared.clone());
    let mut second = SyncAdapter::new(shared.clone());
    first.activate().unwrap();
    second.activate().unwrap();
    latest(&mut first).await;
    latest(&mut second).await;

    ListController::new(shared).create("shared").await.unwrap();

    assert_eq!(texts(&latest(&mut first).await), ["shared"]);
    assert_eq!(texts(&latest(&mut second).await), ["shared"]);

    drop(first);
    assert_eq!(collection.live_subscriptions(), 1);
    drop(second);
    assert_eq!(collection.live_subscriptions(), 0);
}
