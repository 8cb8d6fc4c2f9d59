//! Engine errors.

use menuribbon_core::{ElementId, TreeError};
use thiserror::Error;

/// Errors from structural engine operations.
///
/// Interaction (hover, click, focus, keys) never fails; only building and
/// editing the menu tree does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Element tree rejected the change
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Operation needs a popup item
    #[error("{0} is not a popup item")]
    NotAnItem(ElementId),

    /// Entry index past the end of the collection
    #[error("index {index} out of range for {item} with {len} entries")]
    IndexOutOfRange {
        /// Owning item
        item: ElementId,
        /// Requested index
        index: usize,
        /// Collection length
        len: usize,
    },

    /// Element already listed in another item's entries
    #[error("{element} is already an entry of {owner}")]
    AlreadyOwned {
        /// Element being added
        element: ElementId,
        /// Current owner
        owner: ElementId,
    },
}
