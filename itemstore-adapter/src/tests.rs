use crate::*;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use itemstore::{DataError, ItemProvider, ItemStore, StoreConfig};

#[derive(Clone, Debug, PartialEq)]
struct Person {
    id: u32,
    name: String,
    age: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PersonField {
    Name,
    Age,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct PersonQuery {
    sorts: Vec<ItemSort<PersonField>>,
}

impl SortableQuery<PersonField> for PersonQuery {
    fn apply_sorts(&mut self, sorts: &[ItemSort<PersonField>]) {
        self.sorts = sorts.to_vec();
    }
}

struct PersonProvider {
    people: Vec<Person>,
}

impl PersonProvider {
    fn view(&self, config: &StoreConfig<PersonQuery>) -> Vec<Person> {
        let mut people = self.people.clone();
        for sort in config.query().sorts.iter().rev() {
            match (sort.property(), sort.is_ascending()) {
                (PersonField::Name, true) => people.sort_by(|a, b| a.name.cmp(&b.name)),
                (PersonField::Name, false) => people.sort_by(|a, b| b.name.cmp(&a.name)),
                (PersonField::Age, true) => people.sort_by(|a, b| a.age.cmp(&b.age)),
                (PersonField::Age, false) => people.sort_by(|a, b| b.age.cmp(&a.age)),
            }
        }
        people
    }
}

impl ItemProvider for PersonProvider {
    type Item = Person;
    type Query = PersonQuery;

    fn count(&self, _config: &StoreConfig<PersonQuery>) -> Result<u64, DataError> {
        Ok(self.people.len() as u64)
    }

    fn load(
        &self,
        config: &StoreConfig<PersonQuery>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Person>, DataError> {
        let people = self.view(config);
        let len = people.len() as u64;
        let start = offset.min(len) as usize;
        let end = offset.saturating_add(limit).min(len) as usize;
        Ok(people[start..end].to_vec())
    }
}

fn people() -> Vec<Person> {
    [("carol", 54), ("alice", 30), ("bob", 41)]
        .iter()
        .enumerate()
        .map(|(i, (name, age))| Person {
            id: i as u32,
            name: name.to_string(),
            age: *age,
        })
        .collect()
}

fn person_source(auto_reload: bool) -> DataSource<PersonProvider, u32> {
    let provider = PersonProvider { people: people() };
    let config = StoreConfig::new()
        .with_query(PersonQuery::default())
        .with_auto_reload(auto_reload);
    let store =
        ItemStore::with_identifier(config, provider, cache_size_for_batch(20), |p: &Person| p.id)
            .unwrap();
    DataSource::new(store)
}

#[derive(Default)]
struct RecordingHandler {
    commits: Vec<(Vec<Person>, Vec<Person>, Vec<Person>)>,
    fail_next: bool,
}

impl CommitHandler<Person> for RecordingHandler {
    fn commit(
        &mut self,
        added: &[Person],
        modified: &[Person],
        removed: &[Person],
    ) -> Result<(), DataError> {
        if self.fail_next {
            return Err(DataError::message("persistence unavailable"));
        }
        self.commits
            .push((added.to_vec(), modified.to_vec(), removed.to_vec()));
        Ok(())
    }
}

fn person(id: u32, name: &str, age: i64) -> Person {
    Person {
        id,
        name: name.to_string(),
        age,
    }
}

#[test]
fn commit_hands_over_the_snapshot_and_resets() {
    let mut source = person_source(true);
    let dave = person(100, "dave", 19);
    let erin = person(101, "erin", 62);
    source.add(dave.clone());
    source.add(erin.clone());

    let mut edited = source.store_mut().get_item(2).unwrap();
    edited.age += 1;
    source.update(edited.clone());

    let doomed = source.store_mut().get_item(4).unwrap();
    assert!(source.remove(&doomed).unwrap());

    let mut handler = RecordingHandler::default();
    source.commit(&mut handler).unwrap();

    assert_eq!(handler.commits.len(), 1);
    let (added, modified, removed) = &handler.commits[0];
    // additions arrive oldest first, the reverse of the store's index order
    assert_eq!(added.as_slice(), [dave, erin]);
    assert_eq!(modified.as_slice(), [edited]);
    assert_eq!(removed.as_slice(), [doomed]);

    assert!(!source.store().is_modified());
    assert_eq!(source.store_mut().size().unwrap(), 3);
}

#[test]
fn failed_commit_keeps_the_overlay_for_retry() {
    let mut source = person_source(true);
    source.add(person(100, "dave", 19));

    let mut handler = RecordingHandler {
        fail_next: true,
        ..RecordingHandler::default()
    };
    assert!(source.commit(&mut handler).is_err());
    assert!(source.store().is_modified());

    handler.fail_next = false;
    source.commit(&mut handler).unwrap();
    assert!(!source.store().is_modified());
    assert_eq!(handler.commits.len(), 1);
}

#[test]
fn auto_reload_off_freezes_the_store() {
    let mut source = person_source(false);
    assert!(!source.is_auto_reload());
    assert_eq!(source.store_mut().size().unwrap(), 0);

    // the explicit reload works while frozen
    assert_eq!(source.refresh().unwrap(), 3);
    assert!(!source.is_auto_reload());

    source.set_auto_reload(true);
    assert!(source.is_auto_reload());
    assert_eq!(source.store_mut().get_item(0).unwrap().name, "carol");
}

#[test]
fn sort_reorders_through_the_query_seam() {
    let mut source = person_source(true);
    assert_eq!(source.store_mut().get_item(0).unwrap().name, "carol");

    source.sort(&[ItemSort::asc(PersonField::Name)]);
    assert_eq!(source.store_mut().get_item(0).unwrap().name, "alice");

    source.sort(&[ItemSort::desc(PersonField::Age)]);
    assert_eq!(source.store_mut().get_item(0).unwrap().age, 54);

    source.clear_sorts::<PersonField>();
    assert_eq!(source.store_mut().get_item(0).unwrap().name, "carol");
}

#[test]
fn sorting_discards_pending_edits() {
    let mut source = person_source(true);
    source.add(person(100, "dave", 19));
    assert!(source.store().is_modified());
    source.sort(&[ItemSort::asc(PersonField::Age)]);
    assert!(!source.store().is_modified());
    assert_eq!(source.store_mut().size().unwrap(), 3);
}

#[test]
fn cache_size_heuristic_scales_with_the_batch() {
    assert_eq!(cache_size_for_batch(20), 200);
    assert_eq!(cache_size_for_batch(0), itemstore::DEFAULT_MAX_CACHE_SIZE);
}

#[test]
fn update_is_visible_before_commit() {
    let mut source = person_source(true);
    let mut alice = source.store_mut().get_item(1).unwrap();
    assert_eq!(alice.name, "alice");
    alice.age = 31;
    source.update(alice.clone());
    assert_eq!(source.store_mut().get_item(1).unwrap().age, 31);

    source.discard();
    assert_eq!(source.store_mut().get_item(1).unwrap().age, 30);
}
