use uuid::Uuid;

use super::{Record, Store};
use crate::errors::StoreResult;

/// Process-local store backed by a `Vec`. This is the default for every
/// entity; nothing survives the session.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    records: Vec<T>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing sequence, keeping its order.
    pub fn with_records(records: Vec<T>) -> Self {
        Self { records }
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }
}

impl<T: Record> Store<T> for MemoryStore<T> {
    fn insert(&mut self, record: T) -> StoreResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.clone())
    }

    fn find(&self, id: Uuid) -> StoreResult<Option<T>> {
        Ok(self.position(id).map(|idx| self.records[idx].clone()))
    }

    fn replace(&mut self, record: T) -> StoreResult<bool> {
        match self.position(record.id()) {
            Some(idx) => {
                self.records[idx] = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&mut self, id: Uuid) -> StoreResult<bool> {
        match self.position(id) {
            Some(idx) => {
                self.records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: Uuid,
        label: &'static str,
    }

    impl Record for Item {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn item(label: &'static str) -> Item {
        Item {
            id: Uuid::new_v4(),
            label,
        }
    }

    #[test]
    fn keeps_insertion_order_across_mutations() {
        let (a, b, c) = (item("a"), item("b"), item("c"));
        let mut store = MemoryStore::new();
        store.insert(a.clone()).unwrap();
        store.insert(b.clone()).unwrap();
        store.insert(c.clone()).unwrap();

        assert!(store.remove(b.id).unwrap());
        assert!(store
            .replace(Item {
                label: "a2",
                ..a.clone()
            })
            .unwrap());

        let labels: Vec<_> = store.list().unwrap().iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["a2", "c"]);
    }

    #[test]
    fn missing_ids_report_false() {
        let mut store = MemoryStore::with_records(vec![item("a")]);
        let stranger = item("x");
        assert!(!store.remove(stranger.id).unwrap());
        assert!(!store.replace(stranger.clone()).unwrap());
        assert_eq!(store.find(stranger.id).unwrap(), None);
    }
}
