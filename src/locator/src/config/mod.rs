mod memory;

pub use memory::MemoryConfig;

/// The prefix used when no other one is configured.
pub const DEFAULT_PREFIX: &str = "locator.factory.impl";

/// A read-only view of key-value configuration that the basic factory
/// consults to find implementation names.
///
/// How the values get there is up to the implementor. The factory never
/// writes to a store.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// Returns the single value under `key`, or [`None`] if the key is
    /// absent.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Returns all values under `key` in order, or an empty list if the key
    /// is absent.
    fn get_string_array(&self, key: &str) -> Vec<String>;
}

/// Options of the basic factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryOptions {
    prefix: String,
}

impl FactoryOptions {
    pub fn new() -> Self {
        Self {
            prefix: String::from(DEFAULT_PREFIX),
        }
    }

    /// Sets the namespace prepended to every lookup key before it's sent to
    /// the configuration store.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_options_prefix_succeeds() {
        assert_eq!(FactoryOptions::default().prefix(), DEFAULT_PREFIX);
        assert_eq!(FactoryOptions::new().with_prefix("app").prefix(), "app");
    }
}
