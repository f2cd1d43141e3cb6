use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use super::{local_today, matches, required, Clock};
use crate::errors::{ServiceError, ServiceResult};
use crate::models::{format_date, Loan, LoanFilter, LoanPatch, LoanStatus, NewLoan};
use crate::store::{MemoryStore, Store};

const LOAN_NOT_FOUND: &str = "Loan not found.";

pub struct LoanService {
    store: Box<dyn Store<Loan>>,
    clock: Clock,
}

impl LoanService {
    pub fn new(store: Box<dyn Store<Loan>>) -> Self {
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

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Status of `loan` as of the service clock.
    pub fn status(&self, loan: &Loan) -> LoanStatus {
        loan.status(self.today())
    }

    pub fn create(&mut self, input: NewLoan) -> ServiceResult<Loan> {
        let loaned_on = input.loaned_on.unwrap_or_else(|| self.today());
        let loan = Loan {
            id: Uuid::new_v4(),
            code: required(&input.code, "Loan code is required.")?,
            nickname: required(&input.nickname, "Nickname is required.")?,
            book_code: required(&input.book_code, "Book code is required.")?,
            loaned_on,
            due_on: validate_due(loaned_on, input.due_on)?,
            returned_on: None,
        };
        let taken = self.store.list()?.iter().any(|other| other.code == loan.code);
        if taken {
            return Err(ServiceError::conflict(format!(
                "Loan code {} already exists.",
                loan.code
            )));
        }
        self.store.insert(loan.clone())?;
        info!(id = %loan.id, code = %loan.code, book = %loan.book_code, "loan created");
        Ok(loan)
    }

    pub fn list(&self, filter: Option<&LoanFilter>) -> ServiceResult<Vec<Loan>> {
        let loans = self.store.list()?;
        let Some(filter) = filter else {
            return Ok(loans);
        };
        let date = filter.loaned_on.as_deref().map(str::trim);
        Ok(loans
            .into_iter()
            .filter(|loan| {
                matches(&loan.code, filter.code.as_deref())
                    && matches(&loan.nickname, filter.nickname.as_deref())
                    && matches(&loan.book_code, filter.book_code.as_deref())
                    && matches(&format_date(loan.loaned_on), date)
            })
            .collect())
    }

    pub fn get(&self, id: Uuid) -> ServiceResult<Loan> {
        self.store
            .find(id)?
            .ok_or_else(|| ServiceError::not_found(LOAN_NOT_FOUND))
    }

    pub fn update(&mut self, id: Uuid, patch: LoanPatch) -> ServiceResult<Loan> {
        let mut loan = self.get(id)?;
        if let Some(due_on) = patch.due_on {
            loan.due_on = validate_due(loan.loaned_on, due_on)?;
        }
        if let Some(returned_on) = patch.returned_on {
            if let Some(date) = returned_on {
                if date < loan.loaned_on {
                    return Err(ServiceError::validation(
                        "Return date cannot be before the loan date.",
                    ));
                }
            }
            loan.returned_on = returned_on;
        }
        if !self.store.replace(loan.clone())? {
            return Err(ServiceError::not_found(LOAN_NOT_FOUND));
        }
        info!(%id, code = %loan.code, status = %self.status(&loan), "loan updated");
        Ok(loan)
    }

    /// Overdue loans stay on record until they are returned.
    pub fn delete(&mut self, id: Uuid) -> ServiceResult<()> {
        let loan = self.get(id)?;
        if self.status(&loan) == LoanStatus::Overdue {
            warn!(%id, code = %loan.code, "refusing to delete overdue loan");
            return Err(ServiceError::conflict("Overdue loans cannot be deleted."));
        }
        if !self.store.remove(id)? {
            return Err(ServiceError::not_found(LOAN_NOT_FOUND));
        }
        info!(%id, code = %loan.code, "loan deleted");
        Ok(())
    }
}

fn validate_due(loaned_on: NaiveDate, due_on: NaiveDate) -> ServiceResult<NaiveDate> {
    if due_on < loaned_on {
        Err(ServiceError::validation(
            "Due date cannot be before the loan date.",
        ))
    } else {
        Ok(due_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixed_today;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn input(code: &str, loaned_on: NaiveDate, due_on: NaiveDate) -> NewLoan {
        NewLoan {
            code: code.into(),
            nickname: "ana".into(),
            book_code: "1001".into(),
            loaned_on: Some(loaned_on),
            due_on,
        }
    }

    fn service() -> LoanService {
        LoanService::in_memory().with_clock(fixed_today)
    }

    #[test]
    fn loan_date_defaults_to_today() {
        let mut loans = service();
        let mut new = input("E1", date(11, 1), date(12, 1));
        new.loaned_on = None;
        let created = loans.create(new).unwrap();
        assert_eq!(created.loaned_on, fixed_today());
        assert_eq!(loans.status(&created), LoanStatus::OnTime);
    }

    #[test]
    fn due_date_cannot_precede_loan_date() {
        let mut loans = service();
        let err = loans
            .create(input("E1", date(11, 10), date(11, 9)))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn overdue_loans_cannot_be_deleted_until_returned() {
        let mut loans = service();
        let late = loans.create(input("E1", date(10, 1), date(10, 15))).unwrap();
        assert_eq!(loans.status(&late), LoanStatus::Overdue);
        assert!(matches!(loans.delete(late.id), Err(ServiceError::Conflict(_))));

        let returned = loans
            .update(
                late.id,
                LoanPatch {
                    returned_on: Some(Some(date(11, 18))),
                    ..LoanPatch::default()
                },
            )
            .unwrap();
        assert_eq!(loans.status(&returned), LoanStatus::Returned);
        loans.delete(late.id).unwrap();
    }

    #[test]
    fn filters_on_codes_and_loan_date() {
        let mut loans = service();
        loans.create(input("E1", date(10, 1), date(12, 1))).unwrap();
        loans.create(input("E2", date(11, 2), date(12, 1))).unwrap();
        let filter = LoanFilter {
            loaned_on: Some("2025-11".into()),
            ..LoanFilter::default()
        };
        let found = loans.list(Some(&filter)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "E2");

        let err = loans.create(input("E1", date(11, 1), date(12, 1))).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
