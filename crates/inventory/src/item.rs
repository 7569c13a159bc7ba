use serde::{Deserialize, Serialize};

/// Case-insensitive identity of an item within one category.
///
/// Orders the same way items are listed: lexicographically on the lowercased name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A stack of one item held by a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    name: String,
    quantity: i64,
    #[serde(default)]
    description: String,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: i64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            description: description.into(),
        }
    }

    /// Name as originally entered.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.name)
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Free-text description; empty when unset.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}
