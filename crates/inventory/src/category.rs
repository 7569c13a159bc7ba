use serde::{Deserialize, Serialize};

use satchel_core::ValueObject;

/// Name of a category partitioning a character's items.
///
/// Category names compare case-sensitively, exactly as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const WEAPONS: &'static str = "Weapons";
    pub const IMPORTANT_ITEMS: &'static str = "Important Items";
    pub const GENERAL_ITEMS: &'static str = "General Items";
    pub const MONEY: &'static str = "Money";

    /// Built-in categories, in display and save order.
    pub const BUILTIN: [&'static str; 4] = [
        Self::WEAPONS,
        Self::IMPORTANT_ITEMS,
        Self::GENERAL_ITEMS,
        Self::MONEY,
    ];

    /// Categories whose items carry a free-text description.
    ///
    /// Keyed to built-in names only; categories discovered in a file never qualify.
    pub const DESCRIBED: [&'static str; 3] =
        [Self::WEAPONS, Self::IMPORTANT_ITEMS, Self::GENERAL_ITEMS];

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn weapons() -> Self {
        Self::new(Self::WEAPONS)
    }

    pub fn important_items() -> Self {
        Self::new(Self::IMPORTANT_ITEMS)
    }

    pub fn general_items() -> Self {
        Self::new(Self::GENERAL_ITEMS)
    }

    pub fn money() -> Self {
        Self::new(Self::MONEY)
    }

    pub fn builtins() -> Vec<Self> {
        Self::BUILTIN.iter().map(|name| Self::new(*name)).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_builtin(&self) -> bool {
        Self::BUILTIN.contains(&self.0.as_str())
    }

    pub fn is_description_eligible(&self) -> bool {
        Self::DESCRIBED.contains(&self.0.as_str())
    }
}

impl ValueObject for Category {}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
