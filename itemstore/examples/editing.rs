// Example: buffered add/modify/remove edits and the commit snapshot.
use itemstore::{ItemAction, ItemStore, StoreConfig, VecProvider};

fn main() {
    let provider = VecProvider::new(vec![
        "alpha".to_string(),
        "bravo".to_string(),
        "charlie".to_string(),
    ]);
    let mut store = ItemStore::new(StoreConfig::new(), provider, 100).expect("valid cache capacity");

    let _subscription = store.subscribe(|event| {
        if event.action != ItemAction::Loaded {
            println!("event: {:?} item={:?}", event.action, event.item);
        }
    });

    store.add_item("delta".to_string());
    store.set_item_modified("bravo".to_string());
    store.remove_item(3).unwrap();

    println!("size={}", store.size().unwrap());
    println!("added={:?}", store.added_items());
    println!("modified={:?}", store.modified_items());
    println!("removed={:?}", store.removed_items());

    // after handing the snapshot to a commit handler:
    store.reset(true, true);
    println!("modified after reset: {}", store.is_modified());
}
