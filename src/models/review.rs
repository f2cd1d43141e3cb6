use chrono::NaiveDate;
use uuid::Uuid;

use super::format_date;

/// Highest star rating a review may carry. The lowest is zero.
pub const MAX_STARS: i64 = 5;

/// A reader's rating and comment for a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Generated at creation; never changes.
    pub id: Uuid,
    /// Nickname of the author. Fixed at creation.
    pub nickname: String,
    /// Code of the reviewed book. Fixed at creation and not checked against
    /// the book registry.
    pub book_code: String,
    /// Always within `0..=MAX_STARS`.
    pub stars: u8,
    pub comment: String,
    /// Assigned from the service clock at creation.
    pub reviewed_on: NaiveDate,
}

impl Review {
    /// `★★★☆☆ (3/5)`, as shown in the review table.
    pub fn stars_display(&self) -> String {
        let filled = usize::from(self.stars);
        let empty = (MAX_STARS as usize).saturating_sub(filled);
        format!(
            "{}{} ({}/{})",
            "★".repeat(filled),
            "☆".repeat(empty),
            self.stars,
            MAX_STARS
        )
    }

    pub fn reviewed_on_display(&self) -> String {
        format_date(self.reviewed_on)
    }
}

/// Input for creating a review. `stars` is unchecked until the service
/// validates it.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub nickname: String,
    pub book_code: String,
    pub stars: i64,
    pub comment: String,
}

/// Partial update payload. It can carry every field of a review, but the
/// service only applies `stars` and `comment`; everything else is dropped.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub nickname: Option<String>,
    pub book_code: Option<String>,
    pub stars: Option<i64>,
    pub comment: Option<String>,
    pub reviewed_on: Option<NaiveDate>,
}

impl ReviewPatch {
    pub fn stars(mut self, stars: i64) -> Self {
        self.stars = Some(stars);
        self
    }

    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Names of the fields present in the patch that an update must ignore.
    pub fn ignored_fields(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.nickname.is_some() {
            ignored.push("nickname");
        }
        if self.book_code.is_some() {
            ignored.push("book_code");
        }
        if self.reviewed_on.is_some() {
            ignored.push("reviewed_on");
        }
        ignored
    }
}

/// Substring filters for the review list. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub book_code: Option<String>,
    pub nickname: Option<String>,
    pub reviewed_on: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(stars: u8) -> Review {
        Review {
            id: Uuid::new_v4(),
            nickname: "admin".into(),
            book_code: "1001".into(),
            stars,
            comment: String::new(),
            reviewed_on: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
        }
    }

    #[test]
    fn stars_display_pads_to_five() {
        assert_eq!(sample(3).stars_display(), "★★★☆☆ (3/5)");
        assert_eq!(sample(0).stars_display(), "☆☆☆☆☆ (0/5)");
    }

    #[test]
    fn patch_reports_fields_outside_whitelist() {
        let patch = ReviewPatch {
            book_code: Some("9999".into()),
            ..ReviewPatch::default()
        }
        .stars(2);
        assert_eq!(patch.ignored_fields(), vec!["book_code"]);
        assert!(ReviewPatch::default().comment("ok").ignored_fields().is_empty());
    }
}
