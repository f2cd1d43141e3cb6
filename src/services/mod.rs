//! Domain services: one per entity, each owning an injected [`Store`] and
//! applying the validation and authorization rules before anything reaches
//! it. Every operation either completes or leaves the store untouched.
//!
//! [`Store`]: crate::store::Store

mod books;
mod fines;
mod loans;
mod reviews;
mod users;

use chrono::{Local, NaiveDate};

pub use books::BookService;
pub use fines::FineService;
pub use loans::LoanService;
pub use reviews::ReviewService;
pub use users::UserService;

/// Source of "today" for anything a service stamps or compares dates
/// against. Tests swap it for a fixed date.
pub type Clock = fn() -> NaiveDate;

/// Default clock: the local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Unanchored, case-sensitive substring match. An absent needle matches
/// everything, and so does an empty one.
pub(crate) fn matches(field: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |needle| field.contains(needle))
}

/// Trim a required text input, reporting `message` when it ends up empty.
pub(crate) fn required(value: &str, message: &str) -> crate::errors::ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(crate::errors::ServiceError::validation(message))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
pub(crate) fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
}
