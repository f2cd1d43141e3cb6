use chrono::NaiveDate;
use estante_virtual::models::{Actor, NewReview, ReviewFilter, ReviewPatch, Role};
use estante_virtual::services::ReviewService;
use estante_virtual::store::SqliteReviewStore;
use estante_virtual::ServiceError;

fn review_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
}

fn services() -> Vec<ReviewService> {
    vec![
        ReviewService::in_memory().with_clock(review_day),
        ReviewService::new(Box::new(SqliteReviewStore::open_in_memory().unwrap()))
            .with_clock(review_day),
    ]
}

fn new_review(nickname: &str, book_code: &str, stars: i64, comment: &str) -> NewReview {
    NewReview {
        nickname: nickname.to_string(),
        book_code: book_code.to_string(),
        stars,
        comment: comment.to_string(),
    }
}

#[test]
fn test_star_range_is_enforced_on_create() {
    for mut service in services() {
        for stars in 0..=5 {
            assert!(service.create(new_review("ana", "1001", stars, "")).is_ok());
        }
        for stars in [-1, 6, 55] {
            let err = service
                .create(new_review("ana", "1001", stars, ""))
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
            assert_eq!(err.to_string(), "Star rating must be a value from 0 to 5.");
        }
        assert_eq!(service.list(None).unwrap().len(), 6);
    }
}

#[test]
fn test_rejected_review_is_not_stored() {
    for mut service in services() {
        let result = service.create(new_review("biblio", "55", 6, "x"));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(service.list(None).unwrap().is_empty());
    }
}

#[test]
fn test_created_review_gets_id_and_date() {
    for mut service in services() {
        let created = service
            .create(new_review("ana", "1001", 4, "Gostei"))
            .unwrap();
        let listed = service.list(None).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].reviewed_on, review_day());
        assert_eq!(listed[0].comment, "Gostei");
    }
}

#[test]
fn test_update_changes_stars_but_keeps_book_code() {
    for mut service in services() {
        let created = service.create(new_review("ana", "1001", 4, "")).unwrap();
        let patch = ReviewPatch {
            book_code: Some("9999".to_string()),
            nickname: Some("mallory".to_string()),
            ..ReviewPatch::default().stars(2)
        };
        let updated = service.update(created.id, patch).unwrap();
        assert_eq!(updated.stars, 2);
        assert_eq!(updated.book_code, "1001");
        assert_eq!(updated.nickname, "ana");

        let stored = service.get(created.id).unwrap();
        assert_eq!(stored, updated);
    }
}

#[test]
fn test_update_rejects_out_of_range_stars() {
    for mut service in services() {
        let created = service.create(new_review("ana", "1001", 4, "")).unwrap();
        let err = service
            .update(created.id, ReviewPatch::default().stars(7))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(service.get(created.id).unwrap().stars, 4);
    }
}

#[test]
fn test_update_accepts_every_star_value_in_range() {
    for mut service in services() {
        let created = service.create(new_review("ana", "1001", 3, "")).unwrap();
        for stars in 0..=5 {
            let updated = service
                .update(created.id, ReviewPatch::default().stars(stars))
                .unwrap();
            assert_eq!(i64::from(updated.stars), stars);
            assert_eq!(i64::from(service.get(created.id).unwrap().stars), stars);
        }
        for stars in [-1, 6] {
            let err = service
                .update(created.id, ReviewPatch::default().stars(stars))
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
        assert_eq!(service.get(created.id).unwrap().stars, 5);
    }
}

#[test]
fn test_only_author_or_moderator_may_delete() {
    for mut service in services() {
        let first = service.create(new_review("ana", "1001", 3, "")).unwrap();
        let second = service.create(new_review("ana", "1002", 3, "")).unwrap();

        let err = service
            .delete(first.id, &Actor::new("biblio", Role::Reader))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Authorization(_)));
        assert_eq!(err.to_string(), "You can only delete your own reviews.");

        service.delete(first.id, &Actor::new("ana", Role::Reader)).unwrap();
        service
            .delete(second.id, &Actor::from_nickname("bibliotecario"))
            .unwrap();
        assert!(service.list(None).unwrap().is_empty());

        let err = service
            .delete(second.id, &Actor::from_nickname("admin"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}

#[test]
fn test_book_code_filter_matches_substrings() {
    for mut service in services() {
        service.create(new_review("ana", "1001", 5, "")).unwrap();
        service.create(new_review("biblio", "1002", 3, "")).unwrap();

        let filter = ReviewFilter {
            book_code: Some("100".to_string()),
            ..ReviewFilter::default()
        };
        assert_eq!(service.list(Some(&filter)).unwrap().len(), 2);

        let filter = ReviewFilter {
            book_code: Some("1001".to_string()),
            ..ReviewFilter::default()
        };
        let found = service.list(Some(&filter)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].book_code, "1001");
    }
}

#[test]
fn test_filters_combine_nickname_and_date() {
    for mut service in services() {
        service.create(new_review("ana", "1001", 5, "")).unwrap();
        service.create(new_review("biblio", "1002", 3, "")).unwrap();

        let filter = ReviewFilter {
            nickname: Some("bib".to_string()),
            reviewed_on: Some(" 2025-11 ".to_string()),
            ..ReviewFilter::default()
        };
        let found = service.list(Some(&filter)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].nickname, "biblio");

        let filter = ReviewFilter {
            reviewed_on: Some("2024".to_string()),
            ..ReviewFilter::default()
        };
        assert!(service.list(Some(&filter)).unwrap().is_empty());
    }
}
