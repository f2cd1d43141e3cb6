use std::fmt;

use uuid::Uuid;

/// Account profile recorded for a library user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Administrator,
    Librarian,
    Reader,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Administrator, Profile::Librarian, Profile::Reader];

    pub fn label(self) -> &'static str {
        match self {
            Profile::Administrator => "Administrator",
            Profile::Librarian => "Librarian",
            Profile::Reader => "Reader",
        }
    }

    /// Accept the label or a leading prefix of it, ignoring case ("adm",
    /// "lib", "reader").
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|profile| profile.label().to_lowercase().starts_with(&wanted))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Unique across the user store.
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub profile: Profile,
}

impl User {
    /// First four characters of the id, the short code shown in the table.
    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(4).collect()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub profile: Profile,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub name: Option<String>,
    pub nickname: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parses_prefixes() {
        assert_eq!(Profile::parse("adm"), Some(Profile::Administrator));
        assert_eq!(Profile::parse("LIBRARIAN"), Some(Profile::Librarian));
        assert_eq!(Profile::parse(" r "), Some(Profile::Reader));
        assert_eq!(Profile::parse("guest"), None);
        assert_eq!(Profile::parse(""), None);
    }
}
