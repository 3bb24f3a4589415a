//! Errors surfaced by the recolor command.

use crate::host::HostError;
use crate::isf::CodecError;
use crate::page::NodePath;
use thiserror::Error;

/// Recolor errors.
#[derive(Debug, Error)]
pub enum RecolorError {
    #[error("No ink drawing is selected")]
    NoSelection,
    #[error("The selected ink drawing has no strokes")]
    NoStrokesFound,
    #[error("Ink drawing at {element} could not be decoded: {source}")]
    Codec {
        element: NodePath,
        #[source]
        source: CodecError,
    },
    #[error("Could not fetch page: {0}")]
    Fetch(#[source] HostError),
    #[error("Could not save page: {0}")]
    Persist(#[source] HostError),
}

impl RecolorError {
    /// Whether the user should be told about this error. Everything else is
    /// either silent or an unrecovered failure for the caller to log.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::NoSelection | Self::NoStrokesFound)
    }
}

/// Result type for recolor operations.
pub type RecolorResult<T> = Result<T, RecolorError>;
