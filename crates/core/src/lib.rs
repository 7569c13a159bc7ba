//! `satchel-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no file or console IO).

pub mod error;
pub mod name;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use name::CharacterName;
pub use value_object::ValueObject;
