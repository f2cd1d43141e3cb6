//! Domain models that get passed between the stores, the services and the
//! TUI. The types stay light-weight data holders; validation and business
//! rules live in [`crate::services`] so a swapped-in store never has to care
//! about them.

mod actor;
mod book;
mod fine;
mod loan;
mod review;
mod user;

use chrono::NaiveDate;

pub use actor::{Actor, Role};
pub use book::{Book, BookFilter, BookPatch, NewBook};
pub use fine::{parse_amount, Fine, FineFilter, FinePatch, NewFine};
pub use loan::{Loan, LoanFilter, LoanPatch, LoanStatus, NewLoan};
pub use review::{NewReview, Review, ReviewFilter, ReviewPatch, MAX_STARS};
pub use user::{NewUser, Profile, User, UserFilter, UserPatch};

/// Date layout used everywhere a date is shown or matched against a filter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a date the way the list views and the substring filters expect it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` string as typed into a form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_use_iso_layout() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        assert_eq!(format_date(date), "2025-10-15");
        assert_eq!(parse_date(" 2025-10-15 "), Some(date));
        assert_eq!(parse_date("15/10/2025"), None);
    }
}
