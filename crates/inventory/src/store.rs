//! In-memory inventory of one character.

use std::collections::{BTreeMap, HashMap};

use satchel_core::{DomainError, DomainResult};

use crate::category::Category;
use crate::item::{Item, ItemKey};

/// What the description provider passed to [`InventoryStore::upsert`] is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionRequest<'a> {
    /// The item does not exist yet; a description is required.
    New,
    /// The item exists; returning `None` keeps `current`.
    Existing { current: &'a str },
}

/// Result of [`InventoryStore::upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The item now holds a positive quantity.
    Stored(Item),
    /// The resulting quantity is zero or negative. Nothing was changed; the caller chooses
    /// between [`InventoryStore::remove`] and [`InventoryStore::set_quantity_and_description`].
    NeedsDecision {
        existing: Option<Item>,
        resulting_quantity: i64,
    },
}

/// Category → item state for one character.
///
/// Every known category is always present in the map, possibly empty. Items are keyed
/// case-insensitively, so iteration over a category is already in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryStore {
    categories: Vec<Category>,
    items: HashMap<Category, BTreeMap<ItemKey, Item>>,
}

impl InventoryStore {
    /// Create an empty store holding the built-in categories.
    pub fn new() -> Self {
        let mut store = Self {
            categories: Vec::new(),
            items: HashMap::new(),
        };
        store.initialize();
        store
    }

    /// Reset to the empty state: built-in categories only, no items.
    pub fn initialize(&mut self) {
        self.categories = Category::builtins();
        self.items = self
            .categories
            .iter()
            .map(|c| (c.clone(), BTreeMap::new()))
            .collect();
    }

    /// Known categories in display/save order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn contains_category(&self, category: &Category) -> bool {
        self.items.contains_key(category)
    }

    /// Append `name` to the known categories unless already present.
    ///
    /// Returns `true` if the category was added. Added categories never carry descriptions.
    pub fn add_dynamic_category(&mut self, name: impl Into<String>) -> bool {
        let category = Category::new(name);
        if self.items.contains_key(&category) {
            return false;
        }
        tracing::debug!(category = %category, "category added");
        self.categories.push(category.clone());
        self.items.insert(category, BTreeMap::new());
        true
    }

    /// Case-insensitive lookup.
    pub fn get(&self, category: &Category, name: &str) -> Option<&Item> {
        self.items.get(category)?.get(&ItemKey::new(name.trim()))
    }

    /// Items of `category`, sorted case-insensitively by name.
    ///
    /// Empty for an unknown category. Each call starts a fresh iteration.
    pub fn list_category_items<'a>(
        &'a self,
        category: &Category,
    ) -> impl Iterator<Item = &'a Item> + use<'a> {
        self.items
            .get(category)
            .into_iter()
            .flat_map(|items| items.values())
    }

    pub fn category_len(&self, category: &Category) -> usize {
        self.items.get(category).map_or(0, BTreeMap::len)
    }

    pub fn item_count(&self) -> usize {
        self.items.values().map(BTreeMap::len).sum()
    }

    pub fn has_any_items(&self) -> bool {
        self.items.values().any(|items| !items.is_empty())
    }

    /// Apply `delta` to the item's quantity (a missing item counts as 0).
    ///
    /// When the result is positive the item is stored. In a description-eligible category
    /// `describe` is consulted: a new item must receive a description, an existing item
    /// keeps its current one when `describe` returns `None`. In other categories the
    /// description is always empty and `describe` is not called.
    ///
    /// When the result is zero or negative nothing changes and
    /// [`UpsertOutcome::NeedsDecision`] is returned.
    pub fn upsert<F, E>(
        &mut self,
        category: &Category,
        name: &str,
        delta: i64,
        describe: F,
    ) -> Result<UpsertOutcome, E>
    where
        F: FnOnce(DescriptionRequest<'_>) -> Result<Option<String>, E>,
        E: From<DomainError>,
    {
        let name = validate_item_name(name)?;
        let items = self
            .items
            .get_mut(category)
            .ok_or_else(|| DomainError::not_found(format!("category '{category}'")))?;

        let key = ItemKey::new(name);
        let existing = items.get(&key);
        let current = existing.map_or(0, Item::quantity);
        let resulting = current
            .checked_add(delta)
            .ok_or(DomainError::overflow(current, delta))?;

        if resulting <= 0 {
            return Ok(UpsertOutcome::NeedsDecision {
                existing: existing.cloned(),
                resulting_quantity: resulting,
            });
        }

        let description = if category.is_description_eligible() {
            match existing {
                None => match describe(DescriptionRequest::New)? {
                    Some(text) => normalize_description(&text)?,
                    None => {
                        return Err(DomainError::validation(format!(
                            "a description is required for new item '{name}' in {category}"
                        ))
                        .into());
                    }
                },
                Some(item) => match describe(DescriptionRequest::Existing {
                    current: item.description(),
                })? {
                    Some(text) => normalize_description(&text)?,
                    None => item.description().to_string(),
                },
            }
        } else {
            String::new()
        };

        let display_name = existing.map_or_else(|| name.to_string(), |item| item.name().to_string());
        let item = Item::new(display_name, resulting, description);
        items.insert(key, item.clone());

        tracing::debug!(
            category = %category,
            item = item.name(),
            quantity = item.quantity(),
            "item stored"
        );
        Ok(UpsertOutcome::Stored(item))
    }

    /// Store `quantity` directly, creating the item if needed.
    ///
    /// `description: None` keeps the current description (empty for a new item). The
    /// description is forced empty outside description-eligible categories.
    pub fn set_quantity_and_description(
        &mut self,
        category: &Category,
        name: &str,
        quantity: i64,
        description: Option<&str>,
    ) -> DomainResult<Item> {
        let name = validate_item_name(name)?;
        if quantity < 0 {
            return Err(DomainError::invariant(format!(
                "quantity of '{name}' cannot be negative ({quantity})"
            )));
        }
        let items = self
            .items
            .get_mut(category)
            .ok_or_else(|| DomainError::not_found(format!("category '{category}'")))?;

        let key = ItemKey::new(name);
        let existing = items.get(&key);
        let description = match (category.is_description_eligible(), description) {
            (false, _) => String::new(),
            (true, Some(text)) => normalize_description(text)?,
            (true, None) => existing.map(|item| item.description().to_string()).unwrap_or_default(),
        };
        let display_name = existing.map_or_else(|| name.to_string(), |item| item.name().to_string());

        let item = Item::new(display_name, quantity, description);
        items.insert(key, item.clone());
        tracing::debug!(category = %category, item = item.name(), quantity, "item quantity set");
        Ok(item)
    }

    /// Delete the item if present. Returns the removed item, `None` if there was nothing
    /// to remove.
    pub fn remove(&mut self, category: &Category, name: &str) -> Option<Item> {
        let removed = self
            .items
            .get_mut(category)?
            .remove(&ItemKey::new(name.trim()));
        if let Some(item) = &removed {
            tracing::debug!(category = %category, item = item.name(), "item removed");
        }
        removed
    }

    /// Insert a decoded record verbatim, replacing any same-named item (including its
    /// casing). Unknown categories are added.
    pub(crate) fn put_record(&mut self, category: &Category, item: Item) {
        if !self.contains_category(category) {
            self.add_dynamic_category(category.as_str());
        }
        let item = if category.is_description_eligible() || !item.has_description() {
            item
        } else {
            Item::new(item.name(), item.quantity(), "")
        };
        if let Some(items) = self.items.get_mut(category) {
            items.insert(item.key(), item);
        }
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Item names end up as a `;`-delimited field on one line.
fn validate_item_name(name: &str) -> DomainResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("item name cannot be empty"));
    }
    if name.contains(';') || name.contains(['\n', '\r']) {
        return Err(DomainError::validation(format!(
            "item name '{}' cannot contain ';' or line breaks",
            name.escape_default()
        )));
    }
    Ok(name)
}

/// Descriptions may contain `;` but must stay on one line; surrounding whitespace would
/// not survive a reload, so it is dropped up front.
fn normalize_description(text: &str) -> DomainResult<String> {
    if text.contains(['\n', '\r']) {
        return Err(DomainError::validation("description cannot contain line breaks"));
    }
    Ok(text.trim().to_string())
}
