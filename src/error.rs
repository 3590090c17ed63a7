//! Error types
//!
//! Only conditions with no sane in-band fallback end up here. Everything a
//! player can trigger by clicking (overlapping placement, wrong currency for
//! the rarity, not enough gold) is reported through return values instead.

use thiserror::Error;

/// Hard failures of the loot core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LootError {
    /// The catalog has no equippable base templates at all
    #[error("catalog contains no base item templates")]
    EmptyCatalog,

    /// A template was used as a currency but carries no currency behavior
    #[error("template '{0}' is not a currency")]
    NotCurrency(String),

    /// A currency action tag that the crafting engine does not know
    #[error("unknown currency action: {0}")]
    UnknownCurrencyAction(String),

    /// A template id referenced by an item is missing from the catalog
    #[error("unknown item template: {0}")]
    UnknownTemplate(String),

    /// An item uid that is not held where the caller said it was
    #[error("item {0} not found")]
    ItemNotFound(u64),

    /// Filesystem failure while reading or writing data
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed RON/JSON content
    #[error("parse error: {0}")]
    Parse(String),

    /// Save file written by an incompatible version
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build writes
        expected: u32,
        /// Version found on disk
        found: u32,
    },
}

/// Result alias for loot operations
pub type LootResult<T> = Result<T, LootError>;

impl From<std::io::Error> for LootError {
    fn from(e: std::io::Error) -> Self {
        LootError::Io(e.to_string())
    }
}
