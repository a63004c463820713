use thiserror::Error;

/// Errors surfaced by the public trie API.
///
/// Everything else that can "fail" (no entry within budget, no window,
/// no prefix) is a normal `None` return; queries never leave the trie
/// in a partial state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// A query argument was outside its valid range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A structural operation was attempted on a trie built immutable
    #[error("trie is immutable")]
    ImmutableViolation,
}
