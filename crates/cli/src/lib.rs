//! `satchel-cli`
//!
//! **Responsibility:** the interactive console around the inventory core.
//!
//! This crate provides:
//! - Configuration from the environment
//! - The character roster (inventory directory, character files)
//! - Validated console prompting
//! - The per-character session workflow (add, delete, print, save)

pub mod config;
pub mod prompt;
pub mod roster;
pub mod session;

pub use config::Config;
pub use prompt::{ConsolePrompter, Prompter};
pub use session::Session;
