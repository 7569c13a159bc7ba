//! Character files in the inventory directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use satchel_core::{CharacterName, DomainError};

use crate::prompt::{Prompter, write_banner};
use crate::session::Session;

pub const INVENTORY_EXTENSION: &str = "txt";

/// Make sure `dir` exists and is a writable directory, creating it if needed.
pub fn ensure_directory(dir: &Path) -> anyhow::Result<()> {
    if !dir.exists() {
        tracing::info!(dir = %dir.display(), "inventory directory not found; creating it");
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create inventory directory at {}", dir.display()))?;
        return Ok(());
    }

    let metadata = fs::metadata(dir)
        .with_context(|| format!("failed to inspect inventory directory at {}", dir.display()))?;
    if !metadata.is_dir() {
        bail!("{} exists but is not a directory", dir.display());
    }
    // Removed again when dropped.
    tempfile::Builder::new()
        .prefix(".satchel-write-check")
        .tempfile_in(dir)
        .with_context(|| format!("insufficient permissions to write to {}", dir.display()))?;
    Ok(())
}

/// An inventory file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterFile {
    /// File stem, exactly as it appears on disk.
    pub name: String,
    pub path: PathBuf,
}

/// Inventory files in `dir`, sorted case-insensitively by character name.
pub fn list_characters(dir: &Path) -> anyhow::Result<Vec<CharacterFile>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list inventory directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_inventory = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(INVENTORY_EXTENSION));
        if !is_inventory {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.is_empty() => files.push(CharacterFile {
                name: stem.to_string(),
                path: path.clone(),
            }),
            _ => tracing::warn!(path = %path.display(), "skipping inventory file without a usable name"),
        }
    }
    files.sort_by_key(|file| file.name.to_lowercase());
    Ok(files)
}

pub fn character_path(dir: &Path, name: &CharacterName) -> PathBuf {
    dir.join(format!("{}.{INVENTORY_EXTENSION}", name.as_str()))
}

/// Validate a new character's name against the ones already on disk.
pub fn validate_new_character(
    existing: &[CharacterFile],
    candidate: &str,
) -> Result<CharacterName, DomainError> {
    let name = CharacterName::parse(candidate)?;
    if existing.iter().any(|other| name.eq_ignore_case(&other.name)) {
        return Err(DomainError::conflict(format!(
            "a character named '{name}' already exists"
        )));
    }
    Ok(name)
}

/// Show the character menu and open or create the chosen character.
pub fn select_or_create<P: Prompter, W: Write>(
    dir: &Path,
    prompter: &mut P,
    out: &mut W,
) -> anyhow::Result<Session> {
    let characters = list_characters(dir)?;

    write_banner(out, "Select Character Inventory")?;
    writeln!(out, "0. Create New Character Inventory")?;
    if characters.is_empty() {
        writeln!(out, "(No existing character inventories found)")?;
    }
    for (i, file) in characters.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, file.name)?;
    }
    writeln!(out, "------------------------------------")?;

    let choice = prompter.ranged_integer("Enter selection", 0, characters.len() as i64)?;
    if choice == 0 {
        let name = loop {
            let candidate = prompter.non_empty_text("Enter new character name")?;
            match validate_new_character(&characters, &candidate) {
                Ok(name) => break name,
                Err(err) => writeln!(out, "Error: {err}. Please try again.")?,
            }
        };
        writeln!(out, "Creating new inventory for {name}.")?;
        return Ok(Session::create(dir, name));
    }

    let existing = &characters[(choice - 1) as usize];
    let name = CharacterName::existing(existing.name.as_str())?;
    Ok(Session::open_path(name, existing.path.clone(), out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_inventory::Category;

    use crate::prompt::ConsolePrompter;

    #[test]
    fn ensure_directory_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
        // Existing directories are fine too.
        ensure_directory(&nested).unwrap();
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory");
        fs::write(&file, "").unwrap();
        let err = ensure_directory(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn list_characters_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["zed.txt", "Aria.TXT", "bram.txt", "notes.md", "Aria.txt.tmp"] {
            fs::write(dir.path().join(file), "").unwrap();
        }
        fs::create_dir(dir.path().join("folder.txt")).unwrap();

        let files = list_characters(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Aria", "bram", "zed"]);
        assert_eq!(files[0].path, dir.path().join("Aria.TXT"));
    }

    #[test]
    fn ensure_directory_accepts_writable_directories_and_leaves_them_clean() {
        let dir = tempfile::tempdir().unwrap();
        ensure_directory(dir.path()).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn select_existing_character_keeps_the_exact_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(" Aria.txt"), "Money;Gold;9\n").unwrap();
        fs::write(dir.path().join("Who?.txt"), "Weapons;Bow;1\n").unwrap();

        let mut prompter = ConsolePrompter::new("1\n".as_bytes(), Vec::new());
        let session = select_or_create(dir.path(), &mut prompter, &mut Vec::new()).unwrap();
        assert_eq!(session.name().as_str(), " Aria");
        assert_eq!(session.path(), dir.path().join(" Aria.txt"));
        assert_eq!(session.store().item_count(), 1);

        let mut prompter = ConsolePrompter::new("2\n".as_bytes(), Vec::new());
        let session = select_or_create(dir.path(), &mut prompter, &mut Vec::new()).unwrap();
        assert_eq!(session.name().as_str(), "Who?");
        assert_eq!(session.path(), dir.path().join("Who?.txt"));
        assert!(session.store().get(&Category::weapons(), "bow").is_some());
    }

    #[test]
    fn select_existing_character_uses_the_on_disk_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Aria.TXT"), "Money;Gold;9\n").unwrap();

        let mut prompter = ConsolePrompter::new("1\n".as_bytes(), Vec::new());
        let session = select_or_create(dir.path(), &mut prompter, &mut Vec::new()).unwrap();
        assert_eq!(session.path(), dir.path().join("Aria.TXT"));
        assert_eq!(session.store().item_count(), 1);
    }

    #[test]
    fn new_character_names_must_be_valid_and_unique() {
        let existing = vec![CharacterFile {
            name: "Aria".to_string(),
            path: PathBuf::from("Aria.txt"),
        }];
        assert!(matches!(
            validate_new_character(&existing, "aria"),
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            validate_new_character(&existing, "Ar/ia"),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(
            validate_new_character(&existing, "Bram").unwrap().as_str(),
            "Bram"
        );
    }

    #[test]
    fn select_existing_character_loads_its_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Aria.txt"), "Money;Gold;9\n").unwrap();

        let mut prompter = ConsolePrompter::new("1\n".as_bytes(), Vec::new());
        let mut out = Vec::new();
        let session = select_or_create(dir.path(), &mut prompter, &mut out).unwrap();

        assert_eq!(session.name().as_str(), "Aria");
        assert_eq!(
            session.store().get(&Category::money(), "gold").map(|i| i.quantity()),
            Some(9)
        );
        assert!(String::from_utf8(out).unwrap().contains("1. Aria"));
    }

    #[test]
    fn create_character_retries_until_name_is_acceptable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Aria.txt"), "").unwrap();

        let mut prompter = ConsolePrompter::new("0\naria\nBad/Name\nBram\n".as_bytes(), Vec::new());
        let mut out = Vec::new();
        let session = select_or_create(dir.path(), &mut prompter, &mut out).unwrap();

        assert_eq!(session.name().as_str(), "Bram");
        assert_eq!(session.path(), dir.path().join("Bram.txt"));
        assert!(!session.store().has_any_items());
        assert!(!session.path().exists());

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Please try again.").count(), 2);
        assert!(out.contains("Creating new inventory for Bram."));
    }
}
