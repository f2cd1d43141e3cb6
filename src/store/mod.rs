//! Storage seam behind the services. A store only keeps records in order and
//! finds them by id; validation and business rules stay in the services so an
//! alternative backend can be dropped in without touching them.

mod memory;
mod sqlite;

use uuid::Uuid;

use crate::errors::StoreResult;
use crate::models::{Book, Fine, Loan, Review, User};

pub use memory::MemoryStore;
pub use sqlite::SqliteReviewStore;

/// Anything a store can hold: a record with a stable unique id.
pub trait Record: Clone {
    fn id(&self) -> Uuid;
}

/// Ordered collection of records. Implementations must keep insertion order
/// for `list` and treat ids as unique.
pub trait Store<T: Record> {
    /// Append a record at the end of the sequence.
    fn insert(&mut self, record: T) -> StoreResult<()>;

    /// Snapshot of every record in insertion order.
    fn list(&self) -> StoreResult<Vec<T>>;

    fn find(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Overwrite the record sharing `record.id()`. Returns `false` when no
    /// such record exists.
    fn replace(&mut self, record: T) -> StoreResult<bool>;

    /// Returns `false` when nothing was removed.
    fn remove(&mut self, id: Uuid) -> StoreResult<bool>;
}

impl Record for Review {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Book {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Loan {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Fine {
    fn id(&self) -> Uuid {
        self.id
    }
}
