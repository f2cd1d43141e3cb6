//! Terminal front end for a small lending library: users, books, loans,
//! fines and book reviews, each behind a service that validates input
//! before touching its store.
pub mod config;
pub mod errors;
pub mod library;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
pub mod ui;

pub use config::{Config, StoreKind};
pub use errors::{ServiceError, ServiceResult, StoreError};
pub use library::Library;
pub use models::Actor;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
