mod qualifier;

use std::fmt::{Display, Formatter, Result as FmtResult};

pub use qualifier::{Qualifier, Qualifiers};

/// The character joining a contract name, its qualifier tokens and the
/// configuration prefix.
pub const SEPARATOR: char = '.';

/// An abstract type identity that implementations are resolved for.
///
/// A [`Contract`] is usually a trait object such as `dyn Greeter`, though any
/// `'static` type may act as one. [`Contract::NAME`] is the textual identity
/// used to build [`LookupKey`]s, so it must stay stable across processes that
/// share the same configuration. The [`contract!`] macro is the shortest way
/// to declare one:
///
/// ```rust
/// # use locator::contract;
/// pub trait Greeter: Send + Sync + 'static {
///     fn greet(&self) -> String;
/// }
///
/// contract!(dyn Greeter, "com.example.Greeter");
///
/// # use locator::key::Contract;
/// assert_eq!(<dyn Greeter as Contract>::NAME, "com.example.Greeter");
/// ```
///
/// [`contract!`]: crate::contract
pub trait Contract: Send + Sync + 'static {
    /// The stable identity of the contract.
    const NAME: &'static str;
}

/// Declares a type as a [`Contract`] with the given name.
///
/// Without a name, the contract is named after the module path of the
/// invocation and the stringified type, such as `my_crate::net::dyn Socket`.
/// That name holds `::` and a space, so it only suits contracts resolved
/// through provider bindings. A contract looked up in configuration should
/// be given an explicit dotted name like `"net.Socket"`.
#[macro_export]
macro_rules! contract {
    ($ty:ty, $name:expr $(,)?) => {
        impl $crate::key::Contract for $ty {
            const NAME: &'static str = $name;
        }
    };
    ($ty:ty) => {
        $crate::contract!($ty, concat!(module_path!(), "::", stringify!($ty)));
    };
}

/// A deterministic key identifying a contract narrowed by qualifiers.
///
/// The textual form is the contract name followed by every qualifier token,
/// each preceded by [`SEPARATOR`]. Equal contracts with equal qualifier
/// sequences always produce equal keys, and the order of qualifiers matters.
///
/// # Examples
///
/// ```rust
/// # use locator::key::{LookupKey, Qualifiers};
/// let key = LookupKey::build("com.example.Foo", &Qualifiers::of("A").and("B"));
/// assert_eq!(key.as_str(), "com.example.Foo.A.B");
/// assert_eq!(key.config_key("factory.impl"), "factory.impl.com.example.Foo.A.B");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupKey {
    text: String,
}

impl LookupKey {
    pub fn build(contract: &str, qualifiers: &Qualifiers) -> Self {
        let mut text = String::from(contract);
        for token in qualifiers.tokens() {
            text.push(SEPARATOR);
            text.push_str(token);
        }
        Self { text }
    }

    pub fn of<C>(qualifiers: &Qualifiers) -> Self
    where
        C: Contract + ?Sized,
    {
        Self::build(C::NAME, qualifiers)
    }

    /// Wraps an already assembled key suffix as it is.
    pub fn from_suffix(suffix: impl Into<String>) -> Self {
        Self {
            text: suffix.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the key under which the configuration store holds the
    /// implementation names of this key.
    pub fn config_key(&self, prefix: &str) -> String {
        let prefix = prefix.trim_end_matches(SEPARATOR);
        if prefix.is_empty() {
            self.text.clone()
        } else {
            format!("{prefix}{SEPARATOR}{}", self.text)
        }
    }
}

impl Display for LookupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Foo: Send + Sync + 'static {}

    crate::contract!(dyn Foo, "com.example.Foo");

    #[test]
    fn lookup_key_build_succeeds_without_qualifiers() {
        let key = LookupKey::of::<dyn Foo>(&Qualifiers::none());
        assert_eq!(key.as_str(), "com.example.Foo");
    }

    #[test]
    fn lookup_key_build_succeeds_when_qualifiers_are_appended_in_order() {
        let key = LookupKey::of::<dyn Foo>(&Qualifiers::of("a").and("b"));
        assert_eq!(key.as_str(), "com.example.Foo.a.b");
    }

    #[test]
    fn lookup_key_build_is_order_sensitive() {
        let ab = LookupKey::of::<dyn Foo>(&Qualifiers::of("a").and("b"));
        let ba = LookupKey::of::<dyn Foo>(&Qualifiers::of("b").and("a"));
        assert_ne!(ab, ba);
        assert_eq!(ab, LookupKey::of::<dyn Foo>(&Qualifiers::of("a").and("b")));
    }

    #[test]
    fn lookup_key_build_skips_blank_qualifiers() {
        let key = LookupKey::of::<dyn Foo>(&Qualifiers::of("").and("a").and("  ").and("b"));
        assert_eq!(key.as_str(), "com.example.Foo.a.b");
        assert_eq!(key, LookupKey::of::<dyn Foo>(&Qualifiers::of("a").and("b")));
    }

    #[test]
    fn lookup_key_config_key_succeeds() {
        let key = LookupKey::of::<dyn Foo>(&Qualifiers::of(7));
        assert_eq!(key.config_key("prefix"), "prefix.com.example.Foo.7");
        assert_eq!(key.config_key("prefix."), "prefix.com.example.Foo.7");
        assert_eq!(key.config_key(""), "com.example.Foo.7");
    }

    #[test]
    fn contract_macro_default_name_succeeds() {
        struct Bar;
        crate::contract!(Bar);

        assert!(<Bar as Contract>::NAME.ends_with("::Bar"));
    }

    trait Baz: Send + Sync + 'static {}

    crate::contract!(dyn Baz);

    #[test]
    fn contract_macro_default_name_keeps_module_path_and_type() {
        assert_eq!(
            <dyn Baz as Contract>::NAME,
            concat!(module_path!(), "::", "dyn Baz")
        );
        assert_eq!(
            LookupKey::of::<dyn Baz>(&Qualifiers::of("x")).config_key("p"),
            format!("p.{}::dyn Baz.x", module_path!())
        );
    }
}
