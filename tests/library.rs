use chrono::NaiveDate;
use estante_virtual::models::{
    Actor, FineFilter, FinePatch, LoanFilter, LoanPatch, LoanStatus, NewBook, NewFine, NewLoan,
    NewUser, Profile, UserFilter,
};
use estante_virtual::services::{BookService, LoanService};
use estante_virtual::{Library, ServiceError, StoreKind};

fn seeded(kind: StoreKind) -> Library {
    Library::open(kind, true).unwrap()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn mid_november() -> NaiveDate {
    day(2025, 11, 20)
}

#[test]
fn test_seeded_library_matches_across_backends() {
    for kind in [StoreKind::Memory, StoreKind::Sqlite] {
        let library = seeded(kind);
        let reviews = library.reviews.list(None).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].nickname, "admin");
        assert_eq!(reviews[1].stars, 3);
    }
}

#[test]
fn test_only_administrators_delete_users() {
    let mut library = seeded(StoreKind::Memory);
    let filter = UserFilter {
        nickname: Some("biblio".to_string()),
        ..UserFilter::default()
    };
    let matching = library.users.list(Some(&filter)).unwrap();
    assert_eq!(matching.len(), 2);
    let reader = matching
        .into_iter()
        .find(|user| user.nickname == "biblio")
        .unwrap();

    let err = library
        .users
        .delete(reader.id, &Actor::from_nickname("bibliotecario"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    library
        .users
        .delete(reader.id, &Actor::from_nickname("admin"))
        .unwrap();
    assert_eq!(library.users.list(None).unwrap().len(), 2);
}

#[test]
fn test_duplicate_nicknames_and_codes_are_conflicts() {
    let mut library = seeded(StoreKind::Memory);
    let err = library
        .users
        .create(NewUser {
            name: "Outro Admin".to_string(),
            nickname: "admin".to_string(),
            phone: String::new(),
            email: "outro@estante.local".to_string(),
            profile: Profile::Reader,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Nickname admin is already taken.");

    let err = library
        .books
        .create(NewBook {
            code: "1001".to_string(),
            title: "Memorias Postumas".to_string(),
            author: "Machado de Assis".to_string(),
            year: Some(1881),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = library
        .fines
        .create(NewFine {
            code: "M001".to_string(),
            nickname: "biblio".to_string(),
            loan_code: "E002".to_string(),
            amount_cents: 100,
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[test]
fn test_book_year_cannot_be_in_the_future() {
    let mut books = BookService::in_memory().with_clock(mid_november);
    let err = books
        .create(NewBook {
            code: "2001".to_string(),
            title: "Ainda Nao Escrito".to_string(),
            author: String::new(),
            year: Some(2026),
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Publication year cannot be after 2025.");

    let book = books
        .create(NewBook {
            code: "2001".to_string(),
            title: "Recem Lancado".to_string(),
            author: String::new(),
            year: Some(2025),
        })
        .unwrap();
    assert_eq!(book.display_title(), "Recem Lancado");
}

#[test]
fn test_overdue_loans_cannot_be_deleted_until_returned() {
    let mut loans = LoanService::in_memory().with_clock(mid_november);
    let loan = loans
        .create(NewLoan {
            code: "E100".to_string(),
            nickname: "biblio".to_string(),
            book_code: "1001".to_string(),
            loaned_on: Some(day(2025, 11, 1)),
            due_on: day(2025, 11, 15),
        })
        .unwrap();
    assert_eq!(loans.status(&loan), LoanStatus::Overdue);

    let err = loans.delete(loan.id).unwrap_err();
    assert_eq!(err.to_string(), "Overdue loans cannot be deleted.");

    let returned = loans
        .update(
            loan.id,
            LoanPatch {
                returned_on: Some(Some(day(2025, 11, 18))),
                ..LoanPatch::default()
            },
        )
        .unwrap();
    assert_eq!(loans.status(&returned), LoanStatus::Returned);
    loans.delete(loan.id).unwrap();
    assert!(loans.list(None).unwrap().is_empty());
}

#[test]
fn test_loan_defaults_to_today_and_validates_due_date() {
    let mut loans = LoanService::in_memory().with_clock(mid_november);
    let err = loans
        .create(NewLoan {
            code: "E200".to_string(),
            nickname: "ana".to_string(),
            book_code: "1003".to_string(),
            loaned_on: None,
            due_on: day(2025, 11, 10),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let loan = loans
        .create(NewLoan {
            code: "E200".to_string(),
            nickname: "ana".to_string(),
            book_code: "1003".to_string(),
            loaned_on: None,
            due_on: day(2025, 12, 4),
        })
        .unwrap();
    assert_eq!(loan.loaned_on, mid_november());
    assert_eq!(loans.status(&loan), LoanStatus::OnTime);

    let filter = LoanFilter {
        loaned_on: Some("2025-11-2".to_string()),
        ..LoanFilter::default()
    };
    assert_eq!(loans.list(Some(&filter)).unwrap().len(), 1);
}

#[test]
fn test_paying_a_fine_moves_it_between_filters() {
    let mut library = seeded(StoreKind::Memory);
    let unpaid = FineFilter {
        paid: Some(false),
        ..FineFilter::default()
    };
    let fine = library.fines.list(Some(&unpaid)).unwrap()[0].clone();
    assert_eq!(fine.amount_display(), "7.50");

    library
        .fines
        .update(
            fine.id,
            FinePatch {
                paid: Some(true),
                ..FinePatch::default()
            },
        )
        .unwrap();
    assert!(library.fines.list(Some(&unpaid)).unwrap().is_empty());

    let paid = FineFilter {
        paid: Some(true),
        ..FineFilter::default()
    };
    assert_eq!(library.fines.list(Some(&paid)).unwrap().len(), 1);
}
