//! Path-compressed byte trie with an exact-membership fast path.
//!
//! The tree keeps one node per compressed edge: a node carries the
//! label bytes leading into it, a terminal flag, and children keyed by
//! the first byte of their labels. Between any two public calls the
//! structure satisfies:
//!
//! * siblings never share a first byte,
//! * every non-terminal node other than the root has at least two
//!   children (single-child chains are merged into their parent),
//! * no node other than the root carries an empty label,
//! * the entry set equals the root-to-terminal label concatenations.

use std::collections::{BTreeMap, HashSet};

use derive_new::new;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use slab::Slab;

pub mod compare;
mod fuzzy;
mod mutate;
mod substring;

pub use fuzzy::MeasuredEntry;
pub use substring::{PrefixMatch, SubstringMatch};

/// Index into the node slab.
pub(crate) type NodeId = usize;

/// One compressed edge and its branch point.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Edge bytes leading into this node; empty only at the root.
    pub(crate) label: Vec<u8>,
    /// Whether the root-to-here concatenation is a stored entry.
    pub(crate) terminal: bool,
    /// Children keyed by the first byte of their label, kept sorted so
    /// traversal order is the lexicographic order of entries.
    pub(crate) children: BTreeMap<u8, NodeId>,
    /// Fewest bytes from the end of this label to a terminal below.
    /// `usize::MAX` when the subtree holds no terminal at all.
    pub(crate) min_tail: usize,
    /// Most bytes from the end of this label to a terminal below.
    pub(crate) max_tail: usize,
}

impl Node {
    fn root() -> Self {
        Node {
            label: Vec::new(),
            terminal: false,
            children: BTreeMap::new(),
            min_tail: usize::MAX,
            max_tail: 0,
        }
    }
}

/// Construction options; the defaults match [`PrefixTrie::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    /// Permit insertions and deletions in fuzzy queries. When false,
    /// only substitutions are tolerated.
    pub allow_indels: bool,
    /// Reject `add`/`remove` after construction.
    pub immutable: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            allow_indels: false,
            immutable: true,
        }
    }
}

/// An error-tolerant set of byte strings.
///
/// Entries are arbitrary byte strings, including the empty string.
/// Queries take `&self` and never touch the structure, so read-only
/// sharing across threads is sound; mutation requires `&mut self`.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "TrieSnapshot", from = "TrieSnapshot")
)]
pub struct PrefixTrie {
    pub(crate) nodes: Slab<Node>,
    pub(crate) root: NodeId,
    /// All stored entries, for O(|Q|) exact membership.
    pub(crate) entry_set: HashSet<Box<[u8]>>,
    pub(crate) allow_indels: bool,
    pub(crate) mutable: bool,
}

impl PrefixTrie {
    /// Builds an immutable, substitution-only trie over `entries`.
    /// Duplicates collapse silently.
    pub fn new<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::with_options(entries, Options::default())
    }

    /// Builds a trie over `entries` with explicit `options`.
    ///
    /// Entries are inserted with the same split-preserving routine the
    /// mutation engine uses, which produces the compressed form
    /// directly; the compressed trie of a set is canonical, so the
    /// result is independent of input order.
    pub fn with_options<I, T>(entries: I, options: Options) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut nodes = Slab::new();
        let root = nodes.insert(Node::root());
        let mut trie = PrefixTrie {
            nodes,
            root,
            entry_set: HashSet::new(),
            allow_indels: options.allow_indels,
            mutable: !options.immutable,
        };
        for entry in entries {
            trie.insert_entry(entry.as_ref());
        }
        trie
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entry_set.len()
    }

    /// Returns whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entry_set.is_empty()
    }

    /// Returns whether `entry` is stored, in O(|entry|) expected time.
    pub fn contains(&self, entry: &[u8]) -> bool {
        self.entry_set.contains(entry)
    }

    /// Returns whether fuzzy queries tolerate insertions and deletions.
    pub fn allow_indels(&self) -> bool {
        self.allow_indels
    }

    /// Returns whether structural operations are rejected.
    pub fn is_immutable(&self) -> bool {
        !self.mutable
    }

    /// Iterates over the stored entries in lexicographic order.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            trie: self,
            stack: vec![(self.root, 0)],
            buffer: Vec::new(),
        }
    }

    /// Exact-membership fast path shared by the query entry points.
    /// Never walks the tree.
    pub(crate) fn exact(&self, query: &[u8]) -> Option<MeasuredEntry> {
        self.contains(query)
            .then(|| MeasuredEntry::new(query.to_vec(), 0))
    }

    /// Allocates a node in the slab and returns its id. Leaf tail
    /// bounds start at zero; interior bounds are refreshed by
    /// [`Self::recompute_tails`] once children are attached.
    pub(crate) fn alloc(&mut self, label: Vec<u8>, terminal: bool) -> NodeId {
        self.nodes.insert(Node {
            label,
            terminal,
            children: BTreeMap::new(),
            min_tail: if terminal { 0 } else { usize::MAX },
            max_tail: 0,
        })
    }

    /// Recomputes `min_tail`/`max_tail` for `id` from its direct
    /// children. Callers walk mutated paths bottom-up so child bounds
    /// are already fresh.
    pub(crate) fn recompute_tails(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let mut min_tail = if node.terminal { 0 } else { usize::MAX };
        let mut max_tail = 0;
        for &child in node.children.values() {
            let child = &self.nodes[child];
            min_tail = min_tail.min(child.label.len().saturating_add(child.min_tail));
            max_tail = max_tail.max(child.label.len() + child.max_tail);
        }
        let node = &mut self.nodes[id];
        node.min_tail = min_tail;
        node.max_tail = max_tail;
    }
}

impl<'a> IntoIterator for &'a PrefixTrie {
    type Item = Vec<u8>;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lexicographic iterator over stored entries.
///
/// Depth-first descent with a reusable prefix buffer: each stack frame
/// remembers the buffer length to restore before appending its label,
/// and children are pushed in reverse so the smallest first byte pops
/// first.
pub struct Entries<'a> {
    trie: &'a PrefixTrie,
    stack: Vec<(NodeId, usize)>,
    buffer: Vec<u8>,
}

impl Iterator for Entries<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, restore)) = self.stack.pop() {
            let node = &self.trie.nodes[id];
            self.buffer.truncate(restore);
            self.buffer.extend_from_slice(&node.label);
            for &child in node.children.values().rev() {
                self.stack.push((child, self.buffer.len()));
            }
            if node.terminal {
                return Some(self.buffer.clone());
            }
        }
        None
    }
}

/// Order-insensitive serialization form: the compressed structure is
/// rebuilt from the entry list on the way back in.
#[derive(Debug, Clone, PartialEq, Eq, new)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrieSnapshot {
    pub allow_indels: bool,
    pub immutable: bool,
    /// Entries in lexicographic order.
    pub entries: Vec<Vec<u8>>,
}

impl From<PrefixTrie> for TrieSnapshot {
    fn from(trie: PrefixTrie) -> Self {
        TrieSnapshot {
            allow_indels: trie.allow_indels,
            immutable: !trie.mutable,
            entries: trie.iter().collect(),
        }
    }
}

impl From<TrieSnapshot> for PrefixTrie {
    fn from(snapshot: TrieSnapshot) -> Self {
        PrefixTrie::with_options(
            snapshot.entries,
            Options {
                allow_indels: snapshot.allow_indels,
                immutable: snapshot.immutable,
            },
        )
    }
}

#[cfg(test)]
impl PrefixTrie {
    /// Structural comparison from the roots down: same labels, flags,
    /// and child shape. Used to assert compression canonicity.
    pub(crate) fn structural_eq(&self, other: &PrefixTrie) -> bool {
        fn eq(a: &PrefixTrie, an: NodeId, b: &PrefixTrie, bn: NodeId) -> bool {
            let (an, bn) = (&a.nodes[an], &b.nodes[bn]);
            an.label == bn.label
                && an.terminal == bn.terminal
                && an.children.len() == bn.children.len()
                && an
                    .children
                    .iter()
                    .zip(&bn.children)
                    .all(|((ak, &ac), (bk, &bc))| ak == bk && eq(a, ac, b, bc))
        }
        eq(self, self.root, other, other.root)
    }

    /// Number of live nodes in the slab, root included.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
