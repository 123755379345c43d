//! Error types for Horizon Grid.

use std::path::PathBuf;

use horizon_grid_core::{ComponentId, FlagError, LayoutError, TreeError};

use crate::event::ViewerId;
use crate::session::SessionId;

/// Result type alias for Horizon Grid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Horizon Grid operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Component tree error.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Cell addressing, pattern or cell set error.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Invalid flag token.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// The view definition cannot be opened.
    #[error("Invalid view definition: {0}")]
    InvalidDefinition(String),

    /// The session being opened is already the viewer's active session.
    #[error("Session {0} is already open")]
    AlreadyOpen(SessionId),

    /// The viewer has no active session.
    #[error("Viewer {0} has no open session")]
    NotOpen(ViewerId),

    /// Navigation to a page outside `1..=total`.
    #[error("Page {page} is out of range (total pages: {total})")]
    PageOutOfRange { page: usize, total: usize },

    /// A component ID does not refer to the expected component type.
    #[error("Component {id:?} is not a {expected}")]
    ComponentMismatch {
        id: ComponentId,
        expected: &'static str,
    },

    /// The session registry is disabled.
    #[error("Session registry is disabled")]
    RegistryDisabled,

    /// View configuration could not be parsed.
    #[error("Failed to parse view config: {0}")]
    Config(#[from] toml::de::Error),

    /// View configuration could not be read.
    #[error("Failed to read view config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an invalid-definition error.
    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition(message.into())
    }

    /// Create a component type mismatch error for `T`.
    pub fn component_mismatch<T>(id: ComponentId) -> Self {
        Self::ComponentMismatch {
            id,
            expected: std::any::type_name::<T>(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
