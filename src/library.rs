//! The five services bundled together, plus the sample records the app
//! starts with so every screen has something to show on first launch.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::config::StoreKind;
use crate::errors::StoreResult;
use crate::models::{Book, Fine, Loan, Profile, Review, User};
use crate::services::{BookService, FineService, LoanService, ReviewService, UserService};
use crate::store::{MemoryStore, SqliteReviewStore, Store};

pub struct Library {
    pub users: UserService,
    pub books: BookService,
    pub loans: LoanService,
    pub fines: FineService,
    pub reviews: ReviewService,
}

impl Library {
    /// Empty in-memory library.
    pub fn in_memory() -> Self {
        Self {
            users: UserService::in_memory(),
            books: BookService::in_memory(),
            loans: LoanService::in_memory(),
            fines: FineService::in_memory(),
            reviews: ReviewService::in_memory(),
        }
    }

    /// Build the library with reviews kept in the requested backend, seeding
    /// every store with the sample records when `seed` is set.
    pub fn open(kind: StoreKind, seed: bool) -> StoreResult<Self> {
        let mut review_store: Box<dyn Store<Review>> = match kind {
            StoreKind::Memory => Box::new(MemoryStore::new()),
            StoreKind::Sqlite => Box::new(SqliteReviewStore::open_in_memory()?),
        };

        let library = if seed {
            for review in sample_reviews() {
                review_store.insert(review)?;
            }
            Self {
                users: UserService::new(Box::new(MemoryStore::with_records(sample_users()))),
                books: BookService::new(Box::new(MemoryStore::with_records(sample_books()))),
                loans: LoanService::new(Box::new(MemoryStore::with_records(sample_loans()))),
                fines: FineService::new(Box::new(MemoryStore::with_records(sample_fines()))),
                reviews: ReviewService::new(review_store),
            }
        } else {
            Self {
                reviews: ReviewService::new(review_store),
                ..Self::in_memory()
            }
        };

        info!(?kind, seed, "library opened");
        Ok(library)
    }
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn sample_users() -> Vec<User> {
    let user = |name: &str, nickname: &str, phone: &str, profile| User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        nickname: nickname.to_string(),
        phone: phone.to_string(),
        email: format!("{nickname}@estante.local"),
        profile,
    };
    vec![
        user("Administrador", "admin", "(11) 4000-0001", Profile::Administrator),
        user("Bibliotecário", "bibliotecario", "(11) 4000-0002", Profile::Librarian),
        user("Beatriz Lima", "biblio", "(11) 98888-1234", Profile::Reader),
    ]
}

fn sample_books() -> Vec<Book> {
    let book = |code: &str, title: &str, author: &str, year| Book {
        id: Uuid::new_v4(),
        code: code.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        year: Some(year),
    };
    vec![
        book("1001", "Dom Casmurro", "Machado de Assis", 1899),
        book("1002", "Vidas Secas", "Graciliano Ramos", 1938),
        book("1003", "A Hora da Estrela", "Clarice Lispector", 1977),
    ]
}

fn sample_loans() -> Vec<Loan> {
    vec![
        Loan {
            id: Uuid::new_v4(),
            code: "E001".to_string(),
            nickname: "biblio".to_string(),
            book_code: "1002".to_string(),
            loaned_on: day(2025, 10, 20),
            due_on: day(2025, 11, 3),
            returned_on: Some(day(2025, 11, 1)),
        },
        Loan {
            id: Uuid::new_v4(),
            code: "E002".to_string(),
            nickname: "biblio".to_string(),
            book_code: "1003".to_string(),
            loaned_on: day(2025, 11, 5),
            due_on: day(2025, 11, 19),
            returned_on: None,
        },
    ]
}

fn sample_fines() -> Vec<Fine> {
    vec![Fine {
        id: Uuid::new_v4(),
        code: "M001".to_string(),
        nickname: "biblio".to_string(),
        loan_code: "E002".to_string(),
        amount_cents: 750,
        issued_on: day(2025, 11, 20),
        paid: false,
    }]
}

fn sample_reviews() -> Vec<Review> {
    vec![
        Review {
            id: Uuid::new_v4(),
            nickname: "admin".to_string(),
            book_code: "1001".to_string(),
            stars: 5,
            comment: "Livro excelente! Recomendo a leitura.".to_string(),
            reviewed_on: day(2025, 10, 15),
        },
        Review {
            id: Uuid::new_v4(),
            nickname: "biblio".to_string(),
            book_code: "1002".to_string(),
            stars: 3,
            comment: "Bom, mas o final deixou a desejar.".to_string(),
            reviewed_on: day(2025, 11, 1),
        },
    ]
}
