// Example: lazy loading against an in-memory provider.
use itemstore::{ItemStore, StoreConfig, VecProvider};

fn main() {
    let rows: Vec<String> = (0..1000).map(|i| format!("row {i}")).collect();
    let provider = VecProvider::new(rows);
    let config = StoreConfig::new().with_batch_size(50);
    let mut store = ItemStore::new(config, provider, 200).expect("valid cache capacity");

    println!("size={}", store.size().unwrap());
    println!("first={:?}", store.get_item(0).unwrap());
    println!("somewhere={:?}", store.get_item(777).unwrap());
    // a second read of the same index is a cache hit
    println!("again={:?}", store.get_item(777).unwrap());
    println!("store={store:?}");
}
