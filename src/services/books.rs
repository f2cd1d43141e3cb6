use chrono::Datelike;
use tracing::info;
use uuid::Uuid;

use super::{local_today, matches, required, Clock};
use crate::errors::{ServiceError, ServiceResult};
use crate::models::{Book, BookFilter, BookPatch, NewBook};
use crate::store::{MemoryStore, Store};

const BOOK_NOT_FOUND: &str = "Book not found.";

pub struct BookService {
    store: Box<dyn Store<Book>>,
    clock: Clock,
}

impl BookService {
    pub fn new(store: Box<dyn Store<Book>>) -> Self {
        Self {
            store,
            clock: local_today,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn create(&mut self, input: NewBook) -> ServiceResult<Book> {
        let code = required(&input.code, "Book code is required.")?;
        let book = Book {
            id: Uuid::new_v4(),
            title: required(&input.title, "Title is required.")?,
            author: input.author.trim().to_string(),
            year: self.validate_year(input.year)?,
            code,
        };
        let taken = self.store.list()?.iter().any(|other| other.code == book.code);
        if taken {
            return Err(ServiceError::conflict(format!(
                "Book code {} already exists.",
                book.code
            )));
        }
        self.store.insert(book.clone())?;
        info!(id = %book.id, code = %book.code, "book created");
        Ok(book)
    }

    pub fn list(&self, filter: Option<&BookFilter>) -> ServiceResult<Vec<Book>> {
        let books = self.store.list()?;
        let Some(filter) = filter else {
            return Ok(books);
        };
        Ok(books
            .into_iter()
            .filter(|book| {
                matches(&book.code, filter.code.as_deref())
                    && matches(&book.title, filter.title.as_deref())
                    && matches(&book.author, filter.author.as_deref())
            })
            .collect())
    }

    pub fn get(&self, id: Uuid) -> ServiceResult<Book> {
        self.store
            .find(id)?
            .ok_or_else(|| ServiceError::not_found(BOOK_NOT_FOUND))
    }

    /// The catalogue code is not part of the patch: loans and reviews point
    /// at it.
    pub fn update(&mut self, id: Uuid, patch: BookPatch) -> ServiceResult<Book> {
        let mut book = self.get(id)?;
        if let Some(title) = patch.title {
            book.title = required(&title, "Title is required.")?;
        }
        if let Some(author) = patch.author {
            book.author = author.trim().to_string();
        }
        if let Some(year) = patch.year {
            book.year = self.validate_year(year)?;
        }
        if !self.store.replace(book.clone())? {
            return Err(ServiceError::not_found(BOOK_NOT_FOUND));
        }
        info!(%id, code = %book.code, "book updated");
        Ok(book)
    }

    pub fn delete(&mut self, id: Uuid) -> ServiceResult<()> {
        if !self.store.remove(id)? {
            return Err(ServiceError::not_found(BOOK_NOT_FOUND));
        }
        info!(%id, "book deleted");
        Ok(())
    }

    fn validate_year(&self, year: Option<i32>) -> ServiceResult<Option<i32>> {
        let current = (self.clock)().year();
        match year {
            Some(year) if year > current => Err(ServiceError::validation(format!(
                "Publication year cannot be after {current}."
            ))),
            other => Ok(other),
        }
    }
}
