//! One character's inventory session: the menu loop and its actions.
//!
//! The store only offers primitives; decisions that need the player (remove or keep an
//! item at zero, replace a description) are made here.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use satchel_core::{CharacterName, DomainError};
use satchel_inventory::codec::{self, SaveHeader};
use satchel_inventory::{Category, DescriptionRequest, InventoryStore, Item, UpsertOutcome};

use crate::prompt::{Prompter, select_category, write_banner};
use crate::roster::character_path;

const MENU_CHOICES: [char; 5] = ['A', 'D', 'P', 'S', 'Q'];
const RULE: &str = "------------------------------------";

#[derive(Debug, Clone)]
pub struct Session {
    name: CharacterName,
    path: PathBuf,
    store: InventoryStore,
}

impl Session {
    pub fn new(name: CharacterName, path: PathBuf, store: InventoryStore) -> Self {
        Self { name, path, store }
    }

    /// Start a new character with an empty inventory. Nothing is written until saved.
    pub fn create(dir: &Path, name: CharacterName) -> Self {
        let path = character_path(dir, &name);
        tracing::info!(character = %name, "creating new inventory");
        Self::new(name, path, InventoryStore::new())
    }

    /// Load an existing character. A load failure is reported and leaves the session with
    /// an empty inventory.
    pub fn open<W: Write>(dir: &Path, name: CharacterName, out: &mut W) -> io::Result<Self> {
        let path = character_path(dir, &name);
        Self::open_path(name, path, out)
    }

    /// Like [`Session::open`], but reads and later saves the file at exactly `path`.
    pub fn open_path<W: Write>(name: CharacterName, path: PathBuf, out: &mut W) -> io::Result<Self> {
        let mut store = InventoryStore::new();

        writeln!(out, "Loading inventory for {name}...")?;
        match codec::load_into(&path, &mut store) {
            Ok(report) if !report.file_found => {
                writeln!(
                    out,
                    "Inventory file ({}) not found. Starting with empty inventory for {name}.",
                    path.display()
                )?;
            }
            Ok(report) => {
                for warning in &report.warnings {
                    writeln!(out, "Warning: {warning}")?;
                }
                writeln!(out, "Inventory for {name} loaded successfully.")?;
            }
            Err(err) => {
                tracing::error!(character = %name, "{:#}", anyhow::Error::from(err));
                writeln!(out, "Error loading inventory for {name}.")?;
                writeln!(out, "Starting with empty inventory due to loading error.")?;
            }
        }

        Ok(Self::new(name, path, store))
    }

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut InventoryStore {
        &mut self.store
    }

    /// Menu loop; returns once the player quits.
    pub fn run<P: Prompter, W: Write>(&mut self, prompter: &mut P, out: &mut W) -> anyhow::Result<()> {
        loop {
            self.display_menu(out)?;
            match prompter.menu_choice("Enter your choice", &MENU_CHOICES)? {
                'A' => self.add_item(prompter, out)?,
                'D' => self.delete_item(prompter, out)?,
                'P' => self.print_inventory(prompter, out)?,
                'S' => {
                    self.save(out)?;
                }
                _ => {
                    if prompter.yes_no(&format!("Save {}'s inventory before quitting?", self.name))? {
                        self.save(out)?;
                    }
                    writeln!(out, "Exiting Inventory Manager for {}.", self.name)?;
                    return Ok(());
                }
            }
            writeln!(out)?;
        }
    }

    pub fn display_menu<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_banner(out, &format!("Inventory Manager: {}", self.name))?;
        writeln!(out, "A - Add/Update an item")?;
        writeln!(out, "D - Delete an item stack")?;
        writeln!(out, "P - Print inventory (All or by Category)")?;
        writeln!(out, "S - Save inventory to file")?;
        writeln!(out, "Q - Quit the program")?;
        writeln!(out, "\nCurrent Inventory Summary:")?;
        self.write_summary(out)?;
        writeln!(out, "{RULE}")
    }

    /// Item-type counts for each non-empty category.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if !self.store.has_any_items() {
            return writeln!(out, "  Inventory is currently empty.");
        }
        for category in self.store.categories() {
            let count = self.store.category_len(category);
            if count > 0 {
                writeln!(out, "  Category [{category}]: {count} item types")?;
            }
        }
        Ok(())
    }

    /// Add to (or subtract from) an item's quantity.
    pub fn add_item<P: Prompter, W: Write>(&mut self, prompter: &mut P, out: &mut W) -> anyhow::Result<()> {
        let category = select_category(prompter, out, &self.store)?;
        let name = prompter.non_empty_text("Enter the name of the item")?;
        let delta = prompter.integer("Enter the quantity to add (can be negative to subtract)")?;

        let outcome = self.store.upsert(&category, &name, delta, |request| -> anyhow::Result<Option<String>> {
            let description = match request {
                DescriptionRequest::New => Some(
                    prompter.non_empty_text(&format!("Enter description for new item '{name}'"))?,
                ),
                DescriptionRequest::Existing { current } => {
                    if prompter.yes_no(&format!(
                        "Update description for '{name}'? (Current: \"{current}\")"
                    ))? {
                        Some(prompter.non_empty_text("Enter new description")?)
                    } else {
                        None
                    }
                }
            };
            Ok(description)
        });

        match outcome {
            Ok(UpsertOutcome::Stored(item)) => {
                writeln!(
                    out,
                    "Updated '{}' in {category}. New quantity: {}",
                    item.name(),
                    item.quantity()
                )?;
                if category.is_description_eligible() {
                    writeln!(out, "  Description: \"{}\"", item.description())?;
                }
                Ok(())
            }
            Ok(UpsertOutcome::NeedsDecision {
                existing,
                resulting_quantity,
            }) => self.settle_non_positive(prompter, out, &category, &name, existing, resulting_quantity),
            Err(err) => {
                if let Some(domain) = err.downcast_ref::<DomainError>() {
                    writeln!(out, "Error: {domain}")?;
                    return Ok(());
                }
                Err(err)
            }
        }
    }

    /// The quantity would drop to zero or below: remove the item or keep it at zero.
    fn settle_non_positive<P: Prompter, W: Write>(
        &mut self,
        prompter: &mut P,
        out: &mut W,
        category: &Category,
        name: &str,
        existing: Option<Item>,
        resulting_quantity: i64,
    ) -> anyhow::Result<()> {
        writeln!(out, "Resulting quantity for '{name}' is {resulting_quantity}.")?;

        if prompter.yes_no("Remove this item completely?")? {
            match self.store.remove(category, name) {
                Some(item) => writeln!(out, "Item '{}' removed from {category}.", item.name())?,
                None => writeln!(out, "Item '{name}' was not in {category}; nothing to remove.")?,
            }
            return Ok(());
        }

        let mut description = None;
        if category.is_description_eligible() {
            let current = existing.as_ref().map(Item::description).unwrap_or_default();
            if prompter.yes_no(&format!(
                "Quantity is 0. Update description for '{name}'? (Current: \"{current}\")"
            ))? {
                description = Some(prompter.non_empty_text("Enter new description")?);
            }
        }

        match self
            .store
            .set_quantity_and_description(category, name, 0, description.as_deref())
        {
            Ok(item) => writeln!(out, "Item '{}' quantity set to 0 in {category}.", item.name())?,
            Err(err) => writeln!(out, "Error: {err}")?,
        }
        Ok(())
    }

    /// Pick an item stack by number and delete it after confirmation.
    pub fn delete_item<P: Prompter, W: Write>(&mut self, prompter: &mut P, out: &mut W) -> anyhow::Result<()> {
        if !self.store.has_any_items() {
            writeln!(out, "Inventory is empty. Nothing to delete.")?;
            return Ok(());
        }

        let category = select_category(prompter, out, &self.store)?;
        let items: Vec<Item> = self.store.list_category_items(&category).cloned().collect();
        if items.is_empty() {
            writeln!(out, "Category '{category}' is empty or does not exist.")?;
            return Ok(());
        }

        writeln!(out, "\nItems in category '{category}':")?;
        let show_description = category.is_description_eligible();
        for (i, item) in items.iter().enumerate() {
            write!(out, "  {}. {} ({})", i + 1, item.name(), item.quantity())?;
            if show_description && item.has_description() {
                write!(out, " - \"{}\"", item.description())?;
            }
            writeln!(out)?;
        }

        let index = prompter.ranged_integer(
            "Enter the number of the item stack to delete",
            1,
            items.len() as i64,
        )?;
        let target = &items[(index - 1) as usize];

        if !prompter.yes_no(&format!(
            "Are you sure you want to delete all '{}' ({}) from {category}?",
            target.name(),
            target.quantity()
        ))? {
            writeln!(out, "Deletion cancelled.")?;
            return Ok(());
        }

        match self.store.remove(&category, target.name()) {
            Some(item) => writeln!(out, "Item '{}' removed from {category}.", item.name())?,
            None => writeln!(out, "Item '{}' could not be found for removal.", target.name())?,
        }
        Ok(())
    }

    /// Print every category (quantities only) or one category (with descriptions where
    /// the category has them).
    pub fn print_inventory<P: Prompter, W: Write>(&self, prompter: &mut P, out: &mut W) -> anyhow::Result<()> {
        if !self.store.has_any_items() {
            writeln!(out, "\nInventory is currently empty.")?;
            return Ok(());
        }

        writeln!(out, "\nPrint Options:")?;
        writeln!(out, "1. Print All Categories")?;
        writeln!(out, "2. Print Specific Category")?;
        let choice = prompter.ranged_integer("Enter your print choice", 1, 2)?;

        writeln!(out, "\n--- INVENTORY REPORT for {} ---", self.name)?;
        if choice == 1 {
            for category in self.store.categories() {
                if self.store.category_len(category) == 0 {
                    continue;
                }
                writeln!(out, "\nCategory: {category}")?;
                writeln!(out, "--------------------")?;
                for item in self.store.list_category_items(category) {
                    writeln!(out, "  - {:<25} : {}", item.name(), item.quantity())?;
                }
            }
        } else {
            let category = select_category(prompter, out, &self.store)?;
            writeln!(out, "\nCategory: {category}")?;
            writeln!(out, "--------------------")?;
            if self.store.category_len(&category) == 0 {
                writeln!(out, "  No items in this category.")?;
            }
            let show_description = category.is_description_eligible();
            for item in self.store.list_category_items(&category) {
                if show_description && item.has_description() {
                    writeln!(
                        out,
                        "  - {:<25} ({}): {}",
                        item.name(),
                        item.quantity(),
                        item.description()
                    )?;
                } else {
                    writeln!(out, "  - {:<25} : {}", item.name(), item.quantity())?;
                }
            }
        }
        writeln!(out, "--- END OF REPORT ---")?;
        Ok(())
    }

    /// Write the inventory to disk. A failed save is reported, not fatal.
    pub fn save<W: Write>(&self, out: &mut W) -> io::Result<bool> {
        let header = SaveHeader::now(self.name.as_str());
        match codec::save(&self.path, &self.store, &header) {
            Ok(()) => {
                writeln!(out, "{}'s inventory successfully saved.", self.name)?;
                Ok(true)
            }
            Err(err) => {
                let err = anyhow::Error::from(err);
                tracing::error!(character = %self.name, "{err:#}");
                writeln!(out, "Error: {err:#}")?;
                writeln!(out, "Inventory NOT saved.")?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::prompt::ConsolePrompter;

    fn session_in(dir: &Path) -> Session {
        Session::create(dir, CharacterName::parse("Aria").unwrap())
    }

    fn scripted(input: &str) -> ConsolePrompter<&[u8], Vec<u8>> {
        ConsolePrompter::new(input.as_bytes(), Vec::new())
    }

    fn drive<'a, F>(session: &mut Session, input: &'a str, action: F) -> String
    where
        F: FnOnce(&mut Session, &mut ConsolePrompter<&'a [u8], Vec<u8>>, &mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut prompter = scripted(input);
        let mut out = Vec::new();
        action(session, &mut prompter, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn add(session: &mut Session, input: &str) -> String {
        drive(session, input, |s, p, o| s.add_item(p, o))
    }

    fn with_dagger(session: &mut Session) {
        session
            .store_mut()
            .set_quantity_and_description(&Category::weapons(), "Dagger", 5, Some("rusty"))
            .unwrap();
    }

    #[test]
    fn add_new_weapon_asks_for_description() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let out = add(&mut session, "1\nDagger\n2\nrusty\n");

        let dagger = session.store().get(&Category::weapons(), "Dagger").unwrap();
        assert_eq!(dagger.quantity(), 2);
        assert_eq!(dagger.description(), "rusty");
        assert!(out.contains("Updated 'Dagger' in Weapons. New quantity: 2"));
        assert!(out.contains("Description: \"rusty\""));
    }

    #[test]
    fn add_money_skips_description() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let out = add(&mut session, "4\nGold\n50\n");

        let gold = session.store().get(&Category::money(), "Gold").unwrap();
        assert_eq!(gold.quantity(), 50);
        assert_eq!(gold.description(), "");
        assert!(!out.contains("Description"));
    }

    #[test]
    fn add_existing_can_replace_description() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        with_dagger(&mut session);

        add(&mut session, "1\ndagger\n1\ny\npolished\n");

        let dagger = session.store().get(&Category::weapons(), "Dagger").unwrap();
        assert_eq!(dagger.name(), "Dagger");
        assert_eq!(dagger.quantity(), 6);
        assert_eq!(dagger.description(), "polished");
    }

    #[test]
    fn subtracting_to_zero_can_retain_the_item() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        with_dagger(&mut session);

        let out = add(&mut session, "1\nDagger\n-5\nn\nn\n");

        let dagger = session.store().get(&Category::weapons(), "Dagger").unwrap();
        assert_eq!(dagger.quantity(), 0);
        assert_eq!(dagger.description(), "rusty");
        assert!(out.contains("Resulting quantity for 'Dagger' is 0."));
        assert!(out.contains("quantity set to 0 in Weapons"));
    }

    #[test]
    fn subtracting_below_zero_can_remove_the_item() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        with_dagger(&mut session);

        let out = add(&mut session, "1\nDagger\n-9\ny\n");

        assert!(session.store().get(&Category::weapons(), "Dagger").is_none());
        assert!(out.contains("Item 'Dagger' removed from Weapons."));
    }

    #[test]
    fn invalid_item_name_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let out = add(&mut session, "4\nGo;ld\n5\n");

        assert!(out.contains("Error: validation failed"));
        assert!(!session.store().has_any_items());
    }

    #[test]
    fn delete_on_empty_inventory_does_not_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let out = drive(&mut session, "", |s, p, o| s.delete_item(p, o));

        assert!(out.contains("Inventory is empty. Nothing to delete."));
    }

    #[test]
    fn delete_removes_the_chosen_stack_after_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        with_dagger(&mut session);
        session
            .store_mut()
            .set_quantity_and_description(&Category::weapons(), "Axe", 1, Some("heavy"))
            .unwrap();

        let out = drive(&mut session, "1\n2\ny\n", |s, p, o| s.delete_item(p, o));

        assert!(out.contains("1. Axe (1) - \"heavy\""));
        assert!(out.contains("2. Dagger (5) - \"rusty\""));
        assert!(session.store().get(&Category::weapons(), "Dagger").is_none());
        assert!(session.store().get(&Category::weapons(), "Axe").is_some());
    }

    #[test]
    fn delete_can_be_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        with_dagger(&mut session);

        let out = drive(&mut session, "1\n1\nn\n", |s, p, o| s.delete_item(p, o));

        assert!(out.contains("Deletion cancelled."));
        assert!(session.store().get(&Category::weapons(), "Dagger").is_some());
    }

    #[test]
    fn print_all_hides_descriptions_but_category_view_shows_them() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        with_dagger(&mut session);

        let all = drive(&mut session, "1\n", |s, p, o| s.print_inventory(p, o));
        assert!(all.contains("Category: Weapons"));
        assert!(all.contains("Dagger"));
        assert!(!all.contains("rusty"));

        let one = drive(&mut session, "2\n1\n", |s, p, o| s.print_inventory(p, o));
        assert!(one.contains("(5): rusty"));

        let empty = drive(&mut session, "2\n4\n", |s, p, o| s.print_inventory(p, o));
        assert!(empty.contains("No items in this category."));
    }

    #[test]
    fn summary_counts_item_types_per_category() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let mut out = Vec::new();
        session.write_summary(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Inventory is currently empty."));

        with_dagger(&mut session);
        let mut out = Vec::new();
        session.write_summary(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  Category [Weapons]: 1 item types\n"
        );
    }

    #[test]
    fn run_saves_and_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let out = drive(&mut session, "a\n4\nGold\n12\nS\nQ\nn\n", |s, p, o| s.run(p, o));

        assert!(out.contains("Aria's inventory successfully saved."));
        assert!(out.contains("Exiting Inventory Manager for Aria."));
        let saved = fs::read_to_string(dir.path().join("Aria.txt")).unwrap();
        assert!(saved.contains("Money;Gold;12\n"));
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir.path().join("gone"));

        let mut out = Vec::new();
        assert!(!session.save(&mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("Inventory NOT saved."));

        // The store is untouched by the failed save.
        with_dagger(&mut session);
        assert!(session.store().has_any_items());
    }

    #[test]
    fn open_reports_missing_file_and_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let name = CharacterName::parse("Bram").unwrap();

        let mut out = Vec::new();
        let session = Session::open(dir.path(), name.clone(), &mut out).unwrap();
        assert!(!session.store().has_any_items());
        assert!(String::from_utf8(out).unwrap().contains("not found"));

        fs::write(
            dir.path().join("Bram.txt"),
            "# header\nMoney;Gold;x\nSpells;Fireball;1\n",
        )
        .unwrap();
        let mut out = Vec::new();
        let session = Session::open(dir.path(), name, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Warning: line 2: invalid quantity 'x'"));
        assert!(out.contains("Warning: line 3: category 'Spells' is not predefined"));
        assert!(out.contains("Inventory for Bram loaded successfully."));
        assert_eq!(session.store().item_count(), 1);
    }
}
