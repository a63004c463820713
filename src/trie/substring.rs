//! Search variants layered on the shared descent: locating an entry
//! inside a longer text, and exact longest-prefix matching.

use derive_new::new;

use super::compare::common_prefix_len;
use super::fuzzy::Searcher;
use super::PrefixTrie;
use crate::error::TrieError;

/// A window of the searched text together with the entry it matched.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct SubstringMatch {
    pub entry: Vec<u8>,
    pub distance: usize,
    /// Window bounds into the searched text, `start..end`.
    pub start: usize,
    pub end: usize,
}

/// An entry found as an exact prefix of a text suffix.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct PrefixMatch {
    pub entry: Vec<u8>,
    pub start: usize,
    pub length: usize,
}

impl PrefixTrie {
    /// Finds a window `text[start..end]` within edit distance `budget`
    /// of some stored entry, minimizing the distance, then the window
    /// start, then the window length; remaining ties resolve to the
    /// lexicographically smallest entry.
    ///
    /// Each start offset drives one descent in window mode, where a
    /// terminal accepts without the query being consumed and the
    /// window end is read back from the accepting state. Later starts
    /// only count if they strictly beat the distance found so far, so
    /// their descents run under a tighter limit.
    pub fn search_substring(&self, text: &[u8], budget: usize) -> Option<SubstringMatch> {
        let mut best: Option<SubstringMatch> = None;
        for start in 0..=text.len() {
            let limit = match &best {
                None => budget,
                Some(found) if found.distance == 0 => break,
                Some(found) => found.distance - 1,
            };
            let mut searcher = Searcher::window(self, &text[start..], limit);
            searcher.run();
            if let Some(c) = searcher.into_best() {
                best = Some(SubstringMatch::new(
                    c.entry,
                    c.distance,
                    start,
                    start + c.consumed,
                ));
            }
        }
        best
    }

    /// Returns the longest entry that is an exact prefix of some
    /// suffix `text[start..]`, provided it spans at least
    /// `min_match_length` bytes. Length ties resolve to the smallest
    /// start. A zero `min_match_length` is rejected.
    pub fn longest_prefix_match(
        &self,
        text: &[u8],
        min_match_length: usize,
    ) -> Result<Option<PrefixMatch>, TrieError> {
        if min_match_length == 0 {
            return Err(TrieError::InvalidArgument(
                "min_match_length must be positive".into(),
            ));
        }
        let mut best: Option<PrefixMatch> = None;
        for start in 0..text.len() {
            let floor = best.as_ref().map_or(min_match_length - 1, |b| b.length);
            if text.len() - start <= floor {
                // Even the whole suffix cannot beat the current best.
                break;
            }
            if let Some(length) = self.deepest_terminal(&text[start..]) {
                if length > floor {
                    best = Some(PrefixMatch::new(
                        text[start..start + length].to_vec(),
                        start,
                        length,
                    ));
                }
            }
        }
        Ok(best)
    }

    /// Descends along `suffix` and returns the depth of the deepest
    /// terminal passed, ignoring the root.
    fn deepest_terminal(&self, suffix: &[u8]) -> Option<usize> {
        let mut node = self.root;
        let mut pos = 0;
        let mut deepest = None;
        loop {
            if self.nodes[node].terminal && pos > 0 {
                deepest = Some(pos);
            }
            let Some(&child) = suffix
                .get(pos)
                .and_then(|first| self.nodes[node].children.get(first))
            else {
                return deepest;
            };
            let label = &self.nodes[child].label;
            let matched = common_prefix_len(label, &suffix[pos..]);
            if matched < label.len() {
                return deepest;
            }
            pos += matched;
            node = child;
        }
    }
}
