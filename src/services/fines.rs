use tracing::info;
use uuid::Uuid;

use super::{local_today, matches, required, Clock};
use crate::errors::{ServiceError, ServiceResult};
use crate::models::{Fine, FineFilter, FinePatch, NewFine};
use crate::store::{MemoryStore, Store};

const FINE_NOT_FOUND: &str = "Fine not found.";

pub struct FineService {
    store: Box<dyn Store<Fine>>,
    clock: Clock,
}

impl FineService {
    pub fn new(store: Box<dyn Store<Fine>>) -> Self {
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

    /// New fines start unpaid and are dated from the service clock.
    pub fn create(&mut self, input: NewFine) -> ServiceResult<Fine> {
        let fine = Fine {
            id: Uuid::new_v4(),
            code: required(&input.code, "Fine code is required.")?,
            nickname: required(&input.nickname, "Nickname is required.")?,
            loan_code: input.loan_code.trim().to_string(),
            amount_cents: validate_amount(input.amount_cents)?,
            issued_on: (self.clock)(),
            paid: false,
        };
        let taken = self.store.list()?.iter().any(|other| other.code == fine.code);
        if taken {
            return Err(ServiceError::conflict(format!(
                "Fine code {} already exists.",
                fine.code
            )));
        }
        self.store.insert(fine.clone())?;
        info!(id = %fine.id, code = %fine.code, amount = %fine.amount_display(), "fine issued");
        Ok(fine)
    }

    pub fn list(&self, filter: Option<&FineFilter>) -> ServiceResult<Vec<Fine>> {
        let fines = self.store.list()?;
        let Some(filter) = filter else {
            return Ok(fines);
        };
        Ok(fines
            .into_iter()
            .filter(|fine| {
                matches(&fine.nickname, filter.nickname.as_deref())
                    && matches(&fine.loan_code, filter.loan_code.as_deref())
                    && filter.paid.map_or(true, |paid| fine.paid == paid)
            })
            .collect())
    }

    pub fn get(&self, id: Uuid) -> ServiceResult<Fine> {
        self.store
            .find(id)?
            .ok_or_else(|| ServiceError::not_found(FINE_NOT_FOUND))
    }

    pub fn update(&mut self, id: Uuid, patch: FinePatch) -> ServiceResult<Fine> {
        let mut fine = self.get(id)?;
        if let Some(amount_cents) = patch.amount_cents {
            fine.amount_cents = validate_amount(amount_cents)?;
        }
        if let Some(paid) = patch.paid {
            fine.paid = paid;
        }
        if !self.store.replace(fine.clone())? {
            return Err(ServiceError::not_found(FINE_NOT_FOUND));
        }
        info!(%id, code = %fine.code, paid = fine.paid, "fine updated");
        Ok(fine)
    }

    pub fn delete(&mut self, id: Uuid) -> ServiceResult<()> {
        if !self.store.remove(id)? {
            return Err(ServiceError::not_found(FINE_NOT_FOUND));
        }
        info!(%id, "fine deleted");
        Ok(())
    }
}

fn validate_amount(amount_cents: i64) -> ServiceResult<i64> {
    if amount_cents > 0 {
        Ok(amount_cents)
    } else {
        Err(ServiceError::validation("Fine amount must be greater than zero."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixed_today;

    fn input(code: &str, amount_cents: i64) -> NewFine {
        NewFine {
            code: code.into(),
            nickname: "ana".into(),
            loan_code: "E1".into(),
            amount_cents,
        }
    }

    #[test]
    fn fines_start_unpaid_and_dated_today() {
        let mut fines = FineService::in_memory().with_clock(fixed_today);
        let fine = fines.create(input("M1", 250)).unwrap();
        assert!(!fine.paid);
        assert_eq!(fine.issued_on, fixed_today());
        assert!(matches!(fines.create(input("M2", 0)), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn paid_filter_splits_the_list() {
        let mut fines = FineService::in_memory().with_clock(fixed_today);
        let first = fines.create(input("M1", 250)).unwrap();
        fines.create(input("M2", 500)).unwrap();
        fines
            .update(
                first.id,
                FinePatch {
                    paid: Some(true),
                    ..FinePatch::default()
                },
            )
            .unwrap();

        let unpaid = FineFilter {
            paid: Some(false),
            ..FineFilter::default()
        };
        let found = fines.list(Some(&unpaid)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "M2");
    }
}
