use std::fmt::{Display, Formatter, Result as FmtResult};

/// How long an object created by this crate lives and how widely it is
/// shared.
///
/// A [`Scope::Singleton`] object is created at most once per owning cache and
/// handed out to every caller afterwards, for the rest of the cache's
/// lifetime. A [`Scope::Transient`] object is created anew on every request
/// and owned entirely by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    Singleton,
    #[default]
    Transient,
}

impl Scope {
    pub fn from_singleton_flag(singleton: bool) -> Self {
        if singleton {
            Self::Singleton
        } else {
            Self::Transient
        }
    }

    pub fn is_singleton(self) -> bool {
        self == Self::Singleton
    }

    /// Returns the name of the scope in a string literal.
    pub fn to_str(self) -> &'static str {
        match self {
            Self::Singleton => "Singleton",
            Self::Transient => "Transient",
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_from_singleton_flag_succeeds() {
        assert_eq!(Scope::from_singleton_flag(true), Scope::Singleton);
        assert_eq!(Scope::from_singleton_flag(false), Scope::Transient);
        assert!(!Scope::default().is_singleton());
        assert_eq!(Scope::Singleton.to_string(), "Singleton");
    }
}
