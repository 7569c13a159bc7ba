//! Character names, which double as inventory file stems.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Characters that cannot appear in a file name on common platforms.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Validated character name.
///
/// The casing the player typed is kept as-is; comparisons against other names are the
/// caller's concern (see [`CharacterName::eq_ignore_case`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("character name cannot be empty"));
        }
        if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
            return Err(DomainError::validation(format!(
                "character name contains invalid character '{c}' (not allowed: <>:\"/\\|?*)"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Name of a character whose inventory file already exists. Only emptiness is
    /// rejected; the stem is kept verbatim so it still names the same file.
    pub fn existing(stem: impl Into<String>) -> Result<Self, DomainError> {
        let stem = stem.into();
        if stem.is_empty() {
            return Err(DomainError::validation("character name cannot be empty"));
        }
        Ok(Self(stem))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl ValueObject for CharacterName {}

impl core::fmt::Display for CharacterName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CharacterName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CharacterName> for String {
    fn from(value: CharacterName) -> Self {
        value.0
    }
}
