use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    /// Catalogue code referenced by loans and reviews. Unique and immutable.
    pub code: String,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
}

impl Book {
    /// `Title - Author`, dropping the hyphen when the author is blank.
    pub fn display_title(&self) -> String {
        if self.author.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.author)
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub code: String,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
}

/// `year: Some(None)` clears the publication year.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub code: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}
