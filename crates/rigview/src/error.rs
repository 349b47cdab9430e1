//! Error types for rig editing and view settings.
//!
//! Index resolution never fails with an [`Error`]: stale or out-of-range
//! lookups resolve to an invalid index instead. These errors come from the
//! domain operations themselves and are handed back to the caller unchanged.

use crate::rig::{GroupKind, ItemRef};

/// Result type alias for rig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a rig or loading view settings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The handle does not name a live item.
    #[error("Unknown item {0:?}")]
    UnknownItem(ItemRef),

    /// A control was placed into a group of another kind.
    #[error("Cannot place {item:?} into a {kind} group")]
    KindMismatch { item: ItemRef, kind: GroupKind },

    /// The operation does not apply to this item.
    #[error("Invalid target {item:?}: {message}")]
    InvalidTarget { item: ItemRef, message: String },

    /// The item is already a member of the collection.
    #[error("{item:?} is already present in {owner:?}")]
    Duplicate { item: ItemRef, owner: ItemRef },

    /// A row was outside the collection bounds.
    #[error("Row {row} is out of range for {owner:?} ({len} rows)")]
    RowOutOfRange { owner: ItemRef, row: usize, len: usize },

    /// A cell value had the wrong type or could not be parsed.
    #[error("Invalid value for column {column}: {message}")]
    InvalidValue { column: usize, message: String },

    /// View settings could not be parsed.
    #[error("Failed to parse view settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// View settings could not be serialized.
    #[error("Failed to serialize view settings: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Create an invalid-target error.
    pub fn invalid_target(item: impl Into<ItemRef>, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            item: item.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-value error.
    pub fn invalid_value(column: usize, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            column,
            message: message.into(),
        }
    }
}
