//! Character inventory model and its text file format.
//!
//! This crate holds the in-memory [`InventoryStore`] for one character and the codec that
//! maps it to and from `Category;ItemName;Quantity[;Description]` records. Console
//! interaction lives elsewhere.

pub mod category;
pub mod codec;
pub mod item;
pub mod store;

pub use category::Category;
pub use codec::{LoadError, LoadReport, Loaded, ParseWarning, SaveError};
pub use item::{Item, ItemKey};
pub use store::{DescriptionRequest, InventoryStore, UpsertOutcome};
