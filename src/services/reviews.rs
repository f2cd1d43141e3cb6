use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{local_today, matches, required, Clock};
use crate::errors::{ServiceError, ServiceResult};
use crate::models::{Actor, NewReview, Review, ReviewFilter, ReviewPatch, MAX_STARS};
use crate::store::{MemoryStore, Store};

const STARS_OUT_OF_RANGE: &str = "Star rating must be a value from 0 to 5.";
const REVIEW_NOT_FOUND: &str = "Review not found.";
const NOT_REVIEW_OWNER: &str = "You can only delete your own reviews.";

/// Create/list/update/delete over the review store.
///
/// Authorship (`nickname`, `book_code`) and the review date are fixed at
/// creation. Updates only ever touch the star rating and the comment, no
/// matter what the patch carries.
pub struct ReviewService {
    store: Box<dyn Store<Review>>,
    clock: Clock,
}

impl ReviewService {
    pub fn new(store: Box<dyn Store<Review>>) -> Self {
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

    pub fn create(&mut self, input: NewReview) -> ServiceResult<Review> {
        let nickname = required(&input.nickname, "Nickname is required.")?;
        let book_code = required(&input.book_code, "Book code is required.")?;
        let stars = validate_stars(input.stars)?;
        let review = Review {
            id: Uuid::new_v4(),
            nickname,
            book_code,
            stars,
            comment: input.comment,
            reviewed_on: (self.clock)(),
        };
        self.store.insert(review.clone())?;
        info!(id = %review.id, book = %review.book_code, by = %review.nickname, "review created");
        Ok(review)
    }

    /// Every review whose fields contain each supplied filter value. `None`
    /// returns the whole store in insertion order.
    pub fn list(&self, filter: Option<&ReviewFilter>) -> ServiceResult<Vec<Review>> {
        let reviews = self.store.list()?;
        let Some(filter) = filter else {
            return Ok(reviews);
        };
        let date = filter.reviewed_on.as_deref().map(str::trim);
        Ok(reviews
            .into_iter()
            .filter(|review| {
                matches(&review.book_code, filter.book_code.as_deref())
                    && matches(&review.nickname, filter.nickname.as_deref())
                    && matches(&review.reviewed_on_display(), date)
            })
            .collect())
    }

    pub fn get(&self, id: Uuid) -> ServiceResult<Review> {
        self.store
            .find(id)?
            .ok_or_else(|| ServiceError::not_found(REVIEW_NOT_FOUND))
    }

    /// Merge the writable fields of `patch` over the stored review.
    pub fn update(&mut self, id: Uuid, patch: ReviewPatch) -> ServiceResult<Review> {
        let mut review = self.get(id)?;

        let ignored = patch.ignored_fields();
        if !ignored.is_empty() {
            debug!(%id, ?ignored, "dropping read-only review fields from update");
        }

        if let Some(stars) = patch.stars {
            review.stars = validate_stars(stars)?;
        }
        if let Some(comment) = patch.comment {
            review.comment = comment;
        }

        if !self.store.replace(review.clone())? {
            return Err(ServiceError::not_found(REVIEW_NOT_FOUND));
        }
        info!(%id, stars = review.stars, "review updated");
        Ok(review)
    }

    /// Remove a review. Only its author or a moderator may do so.
    pub fn delete(&mut self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let review = self.get(id)?;
        if !actor.may_delete_review_by(&review.nickname) {
            warn!(%id, actor = %actor, author = %review.nickname, "review deletion refused");
            return Err(ServiceError::unauthorized(NOT_REVIEW_OWNER));
        }
        if !self.store.remove(id)? {
            return Err(ServiceError::not_found(REVIEW_NOT_FOUND));
        }
        info!(%id, by = %actor.nickname, "review deleted");
        Ok(())
    }
}

fn validate_stars(stars: i64) -> ServiceResult<u8> {
    if (0..=MAX_STARS).contains(&stars) {
        Ok(stars as u8)
    } else {
        Err(ServiceError::validation(STARS_OUT_OF_RANGE))
    }
}
