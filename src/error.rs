//! Error types for rs-distill.
//!
//! `Error` is what the public extraction entry points return; `TreeError`
//! covers arena operations that can be handed a node that is no longer usable.

use crate::tree::NodeId;

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No extractable content was found in the document.
    #[error("No extractable content found")]
    NoContent,

    /// The document text was already seen more often than allowed.
    #[error("Document is a duplicate of previously extracted content")]
    Duplicate,

    /// The declared document language differs from the requested one.
    #[error("Language mismatch: expected {expected}, document declares {found}")]
    LanguageMismatch { expected: String, found: String },

    /// The result tree is still larger than `max_tree_size` after simplification.
    #[error("Result tree too large: {size} elements (limit {limit})")]
    TreeTooLarge { size: usize, limit: usize },

    /// A configuration document could not be parsed.
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Failure of a single tree mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node has no parent, usually because it was already removed.
    #[error("node {} is detached", .0.index())]
    Detached(NodeId),

    /// The root element cannot be removed or unwrapped.
    #[error("the root element cannot be removed")]
    RootRemoval,

    /// Attaching the node would make it its own ancestor.
    #[error("node {} cannot be moved below itself", .0.index())]
    Cycle(NodeId),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
