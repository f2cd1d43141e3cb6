use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

/// Lifecycle of a loan, derived from its dates rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    OnTime,
    Overdue,
    Returned,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoanStatus::OnTime => "On time",
            LoanStatus::Overdue => "Overdue",
            LoanStatus::Returned => "Returned",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub id: Uuid,
    /// Human-facing loan code, unique across loans.
    pub code: String,
    pub nickname: String,
    pub book_code: String,
    pub loaned_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
}

impl Loan {
    pub fn status(&self, today: NaiveDate) -> LoanStatus {
        if self.returned_on.is_some() {
            LoanStatus::Returned
        } else if today > self.due_on {
            LoanStatus::Overdue
        } else {
            LoanStatus::OnTime
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub code: String,
    pub nickname: String,
    pub book_code: String,
    /// Defaults to the service clock when absent.
    pub loaned_on: Option<NaiveDate>,
    pub due_on: NaiveDate,
}

/// `returned_on: Some(None)` reopens a returned loan.
#[derive(Debug, Clone, Default)]
pub struct LoanPatch {
    pub due_on: Option<NaiveDate>,
    pub returned_on: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Default)]
pub struct LoanFilter {
    pub code: Option<String>,
    pub nickname: Option<String>,
    pub book_code: Option<String>,
    /// Matched against the `YYYY-MM-DD` rendering of `loaned_on`.
    pub loaned_on: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, day).unwrap()
    }

    #[test]
    fn status_follows_dates() {
        let mut loan = Loan {
            id: Uuid::new_v4(),
            code: "E1".into(),
            nickname: "ana".into(),
            book_code: "1001".into(),
            loaned_on: date(1),
            due_on: date(10),
            returned_on: None,
        };
        assert_eq!(loan.status(date(10)), LoanStatus::OnTime);
        assert_eq!(loan.status(date(11)), LoanStatus::Overdue);
        loan.returned_on = Some(date(12));
        assert_eq!(loan.status(date(20)), LoanStatus::Returned);
    }
}
