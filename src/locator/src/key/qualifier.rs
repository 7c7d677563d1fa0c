use std::fmt::Display;

/// A value which narrows down the implementation resolved for a contract.
///
/// Any [`Display`] type is a [`Qualifier`], and its token is the displayed
/// text with surrounding whitespace removed. Qualifier identity is purely
/// textual, so two qualifiers of different types displaying the same text are
/// indistinguishable.
pub trait Qualifier {
    fn token(&self) -> String;
}

impl<T> Qualifier for T
where
    T: Display + ?Sized,
{
    fn token(&self) -> String {
        self.to_string().trim().to_owned()
    }
}

/// An ordered list of qualifier tokens.
///
/// Blank tokens are dropped when they are added, so `Qualifiers::of("")` is
/// the same as [`Qualifiers::none`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Qualifiers {
    tokens: Vec<String>,
}

impl Qualifiers {
    pub fn none() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn of<Q>(qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        Self::none().and(qualifier)
    }

    pub fn and<Q>(mut self, qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        self.push(qualifier);
        self
    }

    pub fn push<Q>(&mut self, qualifier: Q)
    where
        Q: Qualifier,
    {
        let token = qualifier.token();
        if !token.is_empty() {
            self.tokens.push(token);
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<Q: Qualifier> FromIterator<Q> for Qualifiers {
    fn from_iter<I: IntoIterator<Item = Q>>(iter: I) -> Self {
        let mut qualifiers = Self::none();
        qualifiers.extend(iter);
        qualifiers
    }
}

impl<Q: Qualifier> Extend<Q> for Qualifiers {
    fn extend<I: IntoIterator<Item = Q>>(&mut self, iter: I) {
        iter.into_iter().for_each(|qualifier| self.push(qualifier));
    }
}

/// Builds [`Qualifiers`] from a list of qualifier values.
///
/// ```rust
/// # use locator::qualifiers;
/// # use locator::key::Qualifiers;
/// assert_eq!(qualifiers![], Qualifiers::none());
/// assert_eq!(qualifiers!["a", 1], Qualifiers::of("a").and(1));
/// ```
#[macro_export]
macro_rules! qualifiers {
    () => {
        $crate::key::Qualifiers::none()
    };
    ($($qualifier:expr),+ $(,)?) => {
        $crate::key::Qualifiers::none()$(.and($qualifier))+
    };
}
