use std::collections::HashMap;

use parking_lot::RwLock;

use crate::config::ConfigStore;

/// A [`ConfigStore`] kept in memory which may be changed at runtime.
///
/// Each value is split on commas, and every piece is trimmed. Blank pieces
/// are discarded, and a key left without any piece is treated as absent.
/// [`MemoryConfig::append`] adds values after the existing ones, which is how
/// several implementations are listed under one key.
///
/// # Examples
///
/// ```rust
/// # use locator::config::{ConfigStore, MemoryConfig};
/// let config = MemoryConfig::new();
/// config.set("binders", "a.First");
/// config.append("binders", "a.Second, a.Third");
/// assert_eq!(config.get_string("binders").as_deref(), Some("a.First"));
/// assert_eq!(config.get_string_array("binders").len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct MemoryConfig {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let config = Self::new();
        for (key, value) in pairs {
            config.append(key, value.as_ref());
        }
        config
    }

    /// Replaces all values under `key`.
    pub fn set(&self, key: impl Into<String>, value: &str) {
        let key = key.into();
        let values = split_values(value);
        let mut entries = self.entries.write();
        if values.is_empty() {
            entries.remove(&key);
        } else {
            entries.insert(key, values);
        }
    }

    /// Adds values after those already under `key`.
    pub fn append(&self, key: impl Into<String>, value: &str) {
        let values = split_values(value);
        if !values.is_empty() {
            self.entries
                .write()
                .entry(key.into())
                .or_default()
                .extend(values);
        }
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl ConfigStore for MemoryConfig {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .get(key)
            .and_then(|values| values.first().cloned())
    }

    fn get_string_array(&self, key: &str) -> Vec<String> {
        self.entries.read().get(key).cloned().unwrap_or_default()
    }
}

fn split_values(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_config_get_string_fails_when_key_is_absent() {
        let config = MemoryConfig::new();
        assert!(config.get_string("missing").is_none());
        assert!(config.get_string_array("missing").is_empty());
    }

    #[test]
    fn memory_config_set_succeeds() {
        let config = MemoryConfig::new();
        config.set("key", " com.example.FooImpl ");
        assert_eq!(config.get_string("key").as_deref(), Some("com.example.FooImpl"));

        config.set("key", "com.example.BarImpl");
        assert_eq!(config.get_string_array("key"), vec!["com.example.BarImpl"]);
    }

    #[test]
    fn memory_config_set_removes_key_when_value_is_blank() {
        let config = MemoryConfig::new();
        config.set("key", "value");
        config.set("key", " , ");
        assert!(!config.contains("key"));
        assert!(config.get_string("key").is_none());
    }

    #[test]
    fn memory_config_append_keeps_order() {
        let config = MemoryConfig::from_pairs([("key", "a, b"), ("key", "c")]);
        assert_eq!(config.get_string_array("key"), vec!["a", "b", "c"]);
        assert_eq!(config.get_string("key").as_deref(), Some("a"));
    }

    #[test]
    fn memory_config_remove_and_clear_succeed() {
        let config = MemoryConfig::from_pairs([("a", "1"), ("b", "2")]);
        assert!(config.remove("a"));
        assert!(!config.remove("a"));
        config.clear();
        assert!(!config.contains("b"));
    }
}
