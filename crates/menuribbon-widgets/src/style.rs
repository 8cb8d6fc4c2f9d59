//! Styles and the resource dictionary they are looked up in.

use menuribbon_core::DEFAULT_SEPARATOR_STYLE_KEY;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Key under which a resource is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Create a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key of the default separator style.
    #[must_use]
    pub fn separator_style() -> Self {
        Self::new(DEFAULT_SEPARATOR_STYLE_KEY)
    }

    /// Key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Named set of property values applied to an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Style name
    pub name: String,
    /// Property setters
    #[serde(default)]
    pub setters: BTreeMap<String, Value>,
}

impl Style {
    /// Create an empty style.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setters: BTreeMap::new(),
        }
    }

    /// Add a property setter.
    #[must_use]
    pub fn with_setter(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.setters.insert(property.into(), value.into());
        self
    }

    /// Value set for a property.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.setters.get(property)
    }
}

/// Resources reachable from the menu, keyed by [`ResourceKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDictionary {
    styles: HashMap<ResourceKey, Style>,
}

impl ResourceDictionary {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<ResourceKey>, style: Style) -> Option<Style> {
        self.styles.insert(key.into(), style)
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with_style(mut self, key: impl Into<ResourceKey>, style: Style) -> Self {
        self.insert(key, style);
        self
    }

    /// Look up a style.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Style> {
        self.styles.get(&ResourceKey::new(key))
    }

    /// Remove a style.
    pub fn remove(&mut self, key: &str) -> Option<Style> {
        self.styles.remove(&ResourceKey::new(key))
    }

    /// Number of registered styles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if no styles are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
