//! Error-tolerant prefix trie over byte strings.
//!
//! Entries live in a path-compressed trie; queries either take the
//! exact-membership fast path or run a budget-bounded descent that
//! tolerates substitutions and, when enabled, insertions and
//! deletions. The best match minimizes the Levenshtein distance, with
//! ties resolved to the lexicographically smallest entry.
//!
//! ```
//! use proxtrie::{Options, PrefixTrie};
//!
//! let trie = PrefixTrie::with_options(
//!     ["ACGT", "ACGG", "ACGC"],
//!     Options { allow_indels: true, immutable: true },
//! );
//! let hit = trie.search(b"ACGA", 1).unwrap();
//! assert_eq!((hit.entry.as_slice(), hit.distance), (&b"ACGC"[..], 1));
//! assert_eq!(trie.search(b"TTTT", 1), None);
//! assert_eq!(trie.search_count(b"ACGA", 1), 3);
//! ```
//!
//! With the `serde` feature, a trie serializes as its option flags
//! plus the sorted entry list and is rebuilt on deserialization.

mod error;
pub mod levenshtein;
mod trie;

pub use error::TrieError;
pub use trie::{
    Entries, MeasuredEntry, Options, PrefixMatch, PrefixTrie, SubstringMatch, TrieSnapshot,
};
