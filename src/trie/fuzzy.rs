//! Budget-bounded fuzzy descent.
//!
//! The engine walks compressed labels byte-by-byte while tracking the
//! query offset and the edits spent so far. At a divergence it branches
//! into substitution and, when the trie permits them, indel moves;
//! agreeing bytes are consumed wholesale because matching an equal pair
//! is always part of some optimal alignment (the standard edit-distance
//! lemma), which is what lets the wide byte compare serve the head of
//! every match run.

use std::collections::HashSet;

use debug_print::debug_println;
use derive_new::new;

use super::compare::common_prefix_len;
use super::{NodeId, PrefixTrie};

/// A stored entry together with the edit distance a query reached it at.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MeasuredEntry {
    pub entry: Vec<u8>,
    pub distance: usize,
}

/// An accepting state: the entry it reconstructs, its cost, and how
/// many query bytes it consumed (the window end in substring mode).
#[derive(Debug, Clone, new)]
pub(crate) struct Candidate {
    pub(crate) distance: usize,
    pub(crate) consumed: usize,
    pub(crate) entry: Vec<u8>,
}

/// One bounded depth-first search over the trie.
///
/// Three callers share the descent: best-match search (tightening
/// limit, lexicographic tie-break), substring search (`window`
/// acceptance, which accepts at a terminal without consuming the whole
/// query), and counting (fixed limit, every accepted terminal
/// recorded).
pub(crate) struct Searcher<'a> {
    trie: &'a PrefixTrie,
    query: &'a [u8],
    /// Largest admissible edit count. Tightens to the best distance
    /// found so far unless counting, so equal-cost candidates can
    /// still compete on the tie-break.
    limit: usize,
    /// Accept at any terminal boundary, leaving query bytes unread.
    window: bool,
    /// When present, collect accepted terminals instead of one best.
    hits: Option<HashSet<NodeId>>,
    best: Option<Candidate>,
    /// Root-to-current-node label bytes, for entry reconstruction.
    prefix: Vec<u8>,
}

impl<'a> Searcher<'a> {
    pub(crate) fn best_match(trie: &'a PrefixTrie, query: &'a [u8], limit: usize) -> Self {
        Searcher {
            trie,
            query,
            limit,
            window: false,
            hits: None,
            best: None,
            prefix: Vec::new(),
        }
    }

    pub(crate) fn window(trie: &'a PrefixTrie, query: &'a [u8], limit: usize) -> Self {
        Searcher {
            window: true,
            ..Searcher::best_match(trie, query, limit)
        }
    }

    pub(crate) fn counting(trie: &'a PrefixTrie, query: &'a [u8], limit: usize) -> Self {
        Searcher {
            hits: Some(HashSet::new()),
            ..Searcher::best_match(trie, query, limit)
        }
    }

    pub(crate) fn run(&mut self) {
        self.walk(self.trie.root, 0, 0, 0);
    }

    pub(crate) fn into_best(self) -> Option<Candidate> {
        self.best
    }

    pub(crate) fn hit_count(self) -> usize {
        self.hits.map_or(0, |hits| hits.len())
    }

    /// Advances through the label of `node` from `lab_pos` with the
    /// query at `qpos` and `used` edits spent.
    fn walk(&mut self, node: NodeId, lab_pos: usize, qpos: usize, used: usize) {
        let trie = self.trie;
        let label = &trie.nodes[node].label;

        // Swallow the agreeing run in one compare.
        let run = common_prefix_len(&label[lab_pos..], &self.query[qpos..]);
        let (lab_pos, qpos) = (lab_pos + run, qpos + run);

        if lab_pos == label.len() {
            self.boundary(node, qpos, used);
            return;
        }
        if used >= self.limit {
            // Divergence with nothing left to spend.
            return;
        }
        if qpos < self.query.len() {
            // Substitute the edge byte for the query byte.
            self.walk(node, lab_pos + 1, qpos + 1, used + 1);
        }
        if trie.allow_indels {
            // Insert the edge byte into the query.
            self.walk(node, lab_pos + 1, qpos, used + 1);
            if qpos < self.query.len() {
                // Delete the query byte.
                self.walk(node, lab_pos, qpos + 1, used + 1);
            }
        }
    }

    /// Handles the end of a label: acceptance at terminals, then
    /// descent into children that can still pay off.
    fn boundary(&mut self, node: NodeId, qpos: usize, used: usize) {
        let trie = self.trie;
        let qrem = self.query.len() - qpos;

        if trie.nodes[node].terminal {
            if self.window || qrem == 0 {
                self.accept(node, qpos, used);
            } else if trie.allow_indels {
                // Consume the unread query tail as deletions.
                self.accept(node, self.query.len(), used + qrem);
            }
        }

        for &child in trie.nodes[node].children.values() {
            let c = &trie.nodes[child];
            let reach_min = c.label.len().saturating_add(c.min_tail);
            let reach_max = c.label.len() + c.max_tail;
            // Any entry completed below `child` consumes between
            // reach_min and reach_max more bytes; the gap to the
            // unread query length lower-bounds the edits ahead.
            let shortfall = reach_min.saturating_sub(qrem);
            let overshoot = if self.window {
                0
            } else {
                qrem.saturating_sub(reach_max)
            };
            let ahead = shortfall.max(overshoot);
            if ahead > 0 && !trie.allow_indels {
                // Substitutions cannot reconcile a length gap.
                continue;
            }
            if used + ahead > self.limit {
                continue;
            }
            let restore = self.prefix.len();
            self.prefix.extend_from_slice(&c.label);
            self.walk(child, 0, qpos, used);
            self.prefix.truncate(restore);
        }
    }

    /// Records an accepting state at a terminal boundary.
    fn accept(&mut self, node: NodeId, consumed: usize, distance: usize) {
        if distance > self.limit {
            // The limit may have tightened under an in-flight frame.
            return;
        }
        if let Some(hits) = &mut self.hits {
            hits.insert(node);
            return;
        }
        let replace = match &self.best {
            None => true,
            Some(best) => {
                (distance, consumed) < (best.distance, best.consumed)
                    || ((distance, consumed) == (best.distance, best.consumed)
                        && self.prefix.as_slice() < best.entry.as_slice())
            }
        };
        if replace {
            debug_println!(
                "fuzzy: accept {:?} at distance {} ({} query bytes)",
                self.prefix,
                distance,
                consumed
            );
            self.best = Some(Candidate::new(distance, consumed, self.prefix.clone()));
            self.limit = distance;
        }
    }
}

impl PrefixTrie {
    /// Returns a stored entry with the smallest edit distance to
    /// `query`, provided that distance is at most `budget`.
    ///
    /// Distance ties resolve to the lexicographically smallest entry,
    /// independent of insertion order. A `budget` of zero is the exact
    /// lookup; any search short-circuits on an exact hit.
    pub fn search(&self, query: &[u8], budget: usize) -> Option<MeasuredEntry> {
        if let Some(hit) = self.exact(query) {
            return Some(hit);
        }
        if budget == 0 {
            return None;
        }
        let mut searcher = Searcher::best_match(self, query, budget);
        searcher.run();
        searcher
            .into_best()
            .map(|c| MeasuredEntry::new(c.entry, c.distance))
    }

    /// Returns how many stored entries lie within edit distance
    /// `budget` of `query`.
    pub fn search_count(&self, query: &[u8], budget: usize) -> usize {
        if budget == 0 {
            return usize::from(self.contains(query));
        }
        let mut searcher = Searcher::counting(self, query, budget);
        searcher.run();
        searcher.hit_count()
    }
}

#[test]
fn struct_update_keeps_mode_fields_apart() {
    let trie = PrefixTrie::new(["a"]);
    let searcher = Searcher::window(&trie, b"a", 1);
    assert!(searcher.window && searcher.hits.is_none());
    let searcher = Searcher::counting(&trie, b"a", 1);
    assert!(!searcher.window && searcher.hits.is_some());
}
