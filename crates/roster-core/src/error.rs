//! Error types for roster block processing.

/// Error parsing a block's category specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// The specification contains no tokens at all.
    #[error("category specification is empty")]
    Empty,
}

/// Error that leaves a single block untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    /// The marker's category specification could not be parsed.
    #[error("invalid category specification: {0}")]
    Spec(#[from] SpecError),
}

/// Error from merging a whole document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// The document has no marker pairs; there is nothing to update.
    #[error("no readme markers found")]
    NoMarkers,
}
