//! Alias Qualifier Lookup
//!
//! Typed lookup key for retrieving a registered item by its declared
//! qualifier value. This replaces reflective qualifier machinery with a
//! plain value object handed to an [`AliasResolver`]; the registry core
//! does not depend on it.

use std::fmt;
use crate::registry::entry::PluginEntry;

/// Lookup qualifier carrying an alias string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias {
    value: String,
}

impl Alias {
    /// Create an alias qualifier with the given value
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self { value: value.into() }
    }

    /// The qualifier value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.value)
    }
}

/// Resolve an item whose declared qualifier equals the given alias
pub trait AliasResolver {
    type Item;

    /// First item matching the alias, if any
    fn resolve_by_alias(&self, alias: &Alias) -> Option<&Self::Item>;
}

impl AliasResolver for [PluginEntry] {
    type Item = PluginEntry;

    fn resolve_by_alias(&self, alias: &Alias) -> Option<&Self::Item> {
        self.iter().find(|entry| entry.name() == alias.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_value() {
        let alias = Alias::new("com.example.plugin");
        assert_eq!(alias.value(), "com.example.plugin");
        assert_eq!(alias.to_string(), "@com.example.plugin");
    }

    #[test]
    fn test_resolve_by_alias() {
        let entries = vec![
            PluginEntry::new("foo", "1.0.0", "main").unwrap(),
            PluginEntry::new("bar", "2.0.0", "main").unwrap(),
            PluginEntry::new("bar", "2.1.0", "beta").unwrap(),
        ];

        let found = entries.resolve_by_alias(&Alias::new("bar")).unwrap();
        assert_eq!(found.api_version(), "2.0.0");

        assert!(entries.resolve_by_alias(&Alias::new("missing")).is_none());
    }

    #[test]
    fn test_alias_equality() {
        assert_eq!(Alias::new("a"), Alias::new("a"));
        assert_ne!(Alias::new("a"), Alias::new("b"));
    }
}
