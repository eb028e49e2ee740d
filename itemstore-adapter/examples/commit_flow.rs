// Example: buffered editing with a commit handler.
use itemstore::{DataError, ItemStore, StoreConfig, VecProvider};
use itemstore_adapter::{CommitHandler, DataSource, cache_size_for_batch};

struct PrintingHandler;

impl CommitHandler<String> for PrintingHandler {
    fn commit(
        &mut self,
        added: &[String],
        modified: &[String],
        removed: &[String],
    ) -> Result<(), DataError> {
        println!("persisting: +{added:?} ~{modified:?} -{removed:?}");
        Ok(())
    }
}

fn main() {
    let provider = VecProvider::new(vec![
        "alpha".to_string(),
        "bravo".to_string(),
        "charlie".to_string(),
    ]);
    let config = StoreConfig::new().with_batch_size(20);
    let store = ItemStore::new(config, provider, cache_size_for_batch(20)).expect("valid capacity");
    let mut source = DataSource::new(store);

    source.add("delta".to_string());
    source.add("echo".to_string());
    source.update("bravo".to_string());

    println!("size before commit: {}", source.store_mut().size().unwrap());
    source.commit(&mut PrintingHandler).unwrap();
    println!("size after commit: {}", source.store_mut().size().unwrap());
    println!("modified: {}", source.store().is_modified());
}
