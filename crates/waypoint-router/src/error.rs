//! Error types for trie insertion and lookup

use thiserror::Error;

/// Lookup failure: the path does not resolve to a bound route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    /// No child of the current node accepts this segment
    #[error("Could not match node with part '{segment}'")]
    NoMatchingSegment { segment: String },

    /// Traversal completed on a node with no handler bound
    #[error("No path exists for string '{path}'")]
    NotRoutable { path: String },
}

/// Registration failure. The trie is left untouched when one is returned.
#[derive(Debug, Error)]
pub enum InsertError {
    /// Route patterns must start with `/`
    #[error("Invalid route path '{0}': must start with '/'")]
    InvalidPath(String),

    /// A parameter requirement is not a valid regular expression
    #[error("Invalid requirement for parameter '{param}': {source}")]
    InvalidRequirement {
        param: String,
        #[source]
        source: regex::Error,
    },
}
