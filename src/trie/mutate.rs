//! Structural operations: entry insertion with edge splitting, and
//! removal with recompression. Construction funnels through the same
//! insertion routine, so the compression invariants hold from the
//! first entry onward.

use debug_print::debug_println;

use super::compare::common_prefix_len;
use super::{NodeId, PrefixTrie};
use crate::error::TrieError;

impl PrefixTrie {
    /// Stores `entry`. Adding an entry that is already present leaves
    /// the trie untouched. Fails on an immutable trie.
    pub fn add(&mut self, entry: &[u8]) -> Result<(), TrieError> {
        if !self.mutable {
            return Err(TrieError::ImmutableViolation);
        }
        self.insert_entry(entry);
        Ok(())
    }

    /// Drops `entry`. Removing an absent entry leaves the trie
    /// untouched. Fails on an immutable trie.
    pub fn remove(&mut self, entry: &[u8]) -> Result<(), TrieError> {
        if !self.mutable {
            return Err(TrieError::ImmutableViolation);
        }
        self.remove_entry(entry);
        Ok(())
    }

    /// Descends from the root consuming matched labels; attaches a
    /// leaf where the suffix runs off the tree, or splits the edge
    /// where it diverges inside a label.
    pub(crate) fn insert_entry(&mut self, entry: &[u8]) {
        if !self.entry_set.insert(entry.into()) {
            return;
        }
        let mut path = vec![self.root];
        let mut node = self.root;
        let mut rest = entry;
        loop {
            if rest.is_empty() {
                // The entry ends exactly at an existing node.
                self.nodes[node].terminal = true;
                break;
            }
            let Some(child) = self.nodes[node].children.get(&rest[0]).copied() else {
                let leaf = self.alloc(rest.to_vec(), true);
                self.nodes[node].children.insert(rest[0], leaf);
                break;
            };
            let matched = common_prefix_len(&self.nodes[child].label, rest);
            if matched == self.nodes[child].label.len() {
                rest = &rest[matched..];
                node = child;
                path.push(child);
                continue;
            }
            self.split_edge(node, child, matched, &rest[matched..]);
            break;
        }
        for &id in path.iter().rev() {
            self.recompute_tails(id);
        }
    }

    /// Replaces the edge into `child` with an intermediate node
    /// carrying the first `matched` label bytes. The old node keeps
    /// the label tail; `suffix` becomes a sibling leaf, or marks the
    /// intermediate node terminal when the entry ends at the split.
    fn split_edge(&mut self, parent: NodeId, child: NodeId, matched: usize, suffix: &[u8]) {
        debug_assert!(matched < self.nodes[child].label.len());
        let tail = self.nodes[child].label.split_off(matched);
        let head = std::mem::replace(&mut self.nodes[child].label, tail);
        debug_println!("trie: splitting edge {:?} after {} bytes", head, matched);

        let first = head[0];
        let mid = self.alloc(head, suffix.is_empty());
        let tail_first = self.nodes[child].label[0];
        self.nodes[mid].children.insert(tail_first, child);
        if !suffix.is_empty() {
            let leaf = self.alloc(suffix.to_vec(), true);
            self.nodes[mid].children.insert(suffix[0], leaf);
        }
        self.nodes[parent].children.insert(first, mid);
        self.recompute_tails(mid);
    }

    /// Clears the terminal flag for `entry`, then restores the
    /// compression invariants: a childless non-terminal is detached,
    /// and a parent left non-terminal with a single child is merged
    /// with it.
    pub(crate) fn remove_entry(&mut self, entry: &[u8]) {
        if !self.entry_set.remove(entry) {
            return;
        }
        let mut path = vec![self.root];
        let mut node = self.root;
        let mut rest = entry;
        while !rest.is_empty() {
            // The descent cannot miss: the entry was in the set.
            let child = self.nodes[node].children[&rest[0]];
            rest = &rest[self.nodes[child].label.len()..];
            node = child;
            path.push(child);
        }
        debug_assert!(self.nodes[node].terminal);
        self.nodes[node].terminal = false;

        let mut focus = node;
        if focus != self.root && self.nodes[focus].children.is_empty() {
            path.pop();
            let parent = *path.last().unwrap();
            let first = self.nodes[focus].label[0];
            self.nodes[parent].children.remove(&first);
            self.nodes.remove(focus);
            focus = parent;
        }
        if focus != self.root
            && !self.nodes[focus].terminal
            && self.nodes[focus].children.len() == 1
        {
            self.merge_with_only_child(focus);
        }
        for &id in path.iter().rev() {
            self.recompute_tails(id);
        }
    }

    /// Folds the single child of `id` into `id`, concatenating labels
    /// and adopting the child's terminal flag, children, and bounds.
    fn merge_with_only_child(&mut self, id: NodeId) {
        let child = *self.nodes[id].children.values().next().unwrap();
        let merged = self.nodes.remove(child);
        debug_println!("trie: merging label {:?} into its parent", merged.label);
        let node = &mut self.nodes[id];
        node.label.extend_from_slice(&merged.label);
        node.terminal = merged.terminal;
        node.children = merged.children;
        node.min_tail = merged.min_tail;
        node.max_tail = merged.max_tail;
    }
}
