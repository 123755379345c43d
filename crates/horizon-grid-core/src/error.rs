//! Error types for the core grid systems.

use crate::tree::ComponentId;

/// Errors raised while mutating a [`ComponentTree`](crate::ComponentTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The component ID is invalid or the component has been removed.
    #[error("Invalid or removed component ID {0:?}")]
    InvalidComponentId(ComponentId),

    /// The child is already a direct child of the parent.
    #[error("Component {child:?} is already a child of {parent:?}")]
    DuplicateChild {
        parent: ComponentId,
        child: ComponentId,
    },

    /// The child already appears somewhere in the parent's tree.
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    ComponentCycle {
        parent: ComponentId,
        child: ComponentId,
    },

    /// The component is not a direct child of the given parent.
    #[error("Component {child:?} is not a child of {parent:?}")]
    NotAChild {
        parent: ComponentId,
        child: ComponentId,
    },
}

/// Errors raised by cell addressing, patterns and slot sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A range had a negative bound or a start past its end.
    #[error("Invalid range {start}..{end}")]
    InvalidRange { start: i64, end: i64 },

    /// A pattern does not contain the requested character.
    #[error("Character '{0}' does not appear in the pattern")]
    CharacterNotFound(char),

    /// A slot builder had neither an include list nor a start/end range.
    #[error("Slot set needs either an include list or a start and end")]
    MissingSlotSource,

    /// A cell set with no cells was supplied where capacity is required.
    #[error("Cell set is empty")]
    EmptyCellSet,

    /// Scrolling columns must all hold the same number of cells.
    #[error("Scrolling column {column} holds {found} cells, expected {expected}")]
    UnevenColumns {
        column: usize,
        expected: usize,
        found: usize,
    },

    /// The requested grid dimensions are not supported.
    #[error("Unsupported grid size {rows}x{columns}")]
    InvalidGridSize { rows: usize, columns: usize },

    /// The grid kind name is not recognised.
    #[error("Unknown grid kind '{0}'")]
    UnknownGridKind(String),
}

/// Errors raised when validating a [`Flag`](crate::Flag) token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    /// Flags must be at least three characters long.
    #[error("Flag '{0}' is shorter than three characters")]
    TooShort(String),

    /// Flags may only contain lowercase ASCII letters, '_' and '-'.
    #[error("Flag '{flag}' contains invalid character '{character}'")]
    InvalidCharacter { flag: String, character: char },
}

/// Result type for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Result type for layout operations.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
