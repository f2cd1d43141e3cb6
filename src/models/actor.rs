use std::fmt;

/// Capabilities an acting user may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    Librarian,
    Reader,
}

impl Role {
    /// Administrators and librarians may remove reviews written by others.
    pub fn can_moderate_reviews(self) -> bool {
        matches!(self, Role::Administrator | Role::Librarian)
    }

    /// Only administrators may remove user accounts.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Administrator => "administrator",
            Role::Librarian => "librarian",
            Role::Reader => "reader",
        };
        write!(f, "{label}")
    }
}

/// The identity performing a mutating call. It is threaded explicitly through
/// every operation that needs an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub nickname: String,
    pub role: Role,
}

impl Actor {
    /// Reserved nickname that acts with administrator rights.
    pub const ADMIN_NICKNAME: &'static str = "admin";
    /// Reserved nickname that acts with librarian rights.
    pub const LIBRARIAN_NICKNAME: &'static str = "bibliotecario";

    pub fn new<S: Into<String>>(nickname: S, role: Role) -> Self {
        Self {
            nickname: nickname.into(),
            role,
        }
    }

    /// Resolve the role for a nickname. The two reserved nicknames map to the
    /// privileged roles; everyone else is a reader.
    pub fn from_nickname<S: Into<String>>(nickname: S) -> Self {
        let nickname = nickname.into();
        let role = match nickname.as_str() {
            Self::ADMIN_NICKNAME => Role::Administrator,
            Self::LIBRARIAN_NICKNAME => Role::Librarian,
            _ => Role::Reader,
        };
        Self { nickname, role }
    }

    /// Whether this actor may delete a review authored by `author`.
    pub fn may_delete_review_by(&self, author: &str) -> bool {
        self.nickname == author || self.role.can_moderate_reviews()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.nickname, self.role)
    }
}
