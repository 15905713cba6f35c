//! Filter-tree evaluation: combining per-atom matches under AND/OR/NOT.
//!
//! Score semantics per node:
//! - AND sums child scores and merges their witness paths;
//! - OR keeps the best-scoring child (earlier child wins ties);
//! - negation contributes a zero score and no witnesses;
//! - phrase and anchored atoms score from the same per-position bonuses as
//!   the fuzzy scorer, without gaps.

use crate::config::{GapPenalty, SearchArgs};
use crate::fuzzy::scoring::{self, weights, MatchResult, ScoreOpts};
use crate::query::{Atom, AtomKind, Query};

/// A query compiled against one search configuration, ready to evaluate
/// lines. Shared read-only across scan workers.
#[derive(Debug, Clone)]
pub struct FilterTree {
    root: Query,
    preserve_order: bool,
    max_symbol_dist: usize,
    gap_penalty: GapPenalty,
    word_delims: Vec<u8>,
}

impl FilterTree {
    pub fn new(root: Query, args: &SearchArgs) -> Self {
        Self {
            root,
            preserve_order: args.preserve_order,
            max_symbol_dist: args.max_symbol_dist,
            gap_penalty: args.gap_penalty,
            word_delims: args.word_delims.clone().into_bytes(),
        }
    }

    /// Evaluate the tree against one line.
    pub fn eval(&self, text: &str) -> Option<MatchResult> {
        let (mut result, _) = self.eval_node(&self.root, text, 0)?;
        result.path.sort_unstable();
        result.path.dedup();
        Some(result)
    }

    /// Depth-first fold. `lo` is the preserve-order lower bound; the second
    /// tuple element is the bound to hand to the next sibling.
    fn eval_node(&self, node: &Query, text: &str, lo: usize) -> Option<(MatchResult, usize)> {
        match node {
            Query::And(children) => {
                let mut score = 0.0;
                let mut path = Vec::new();
                let mut bound = lo;
                for child in children {
                    let (result, next) = self.eval_node(child, text, bound)?;
                    score += result.score;
                    path.extend(result.path);
                    bound = next;
                }
                Some((MatchResult { score, path }, bound))
            }
            // OR children each start fresh; the bound does not cross an OR.
            Query::Or(children) => {
                let mut best: Option<MatchResult> = None;
                for child in children {
                    if let Some((result, _)) = self.eval_node(child, text, 0) {
                        match &best {
                            Some(current) if result.score <= current.score => {}
                            _ => best = Some(result),
                        }
                    }
                }
                best.map(|result| (result, lo))
            }
            Query::Not(inner) => match self.eval_node(inner, text, 0) {
                Some(_) => None,
                None => Some((MatchResult::empty(), lo)),
            },
            Query::Leaf(atom) if atom.negated => {
                if self.probe_negated(atom, text) {
                    None
                } else {
                    Some((MatchResult::empty(), lo))
                }
            }
            Query::Leaf(atom) => {
                let effective_lo = if self.preserve_order && atom.kind == AtomKind::Fuzzy {
                    lo
                } else {
                    0
                };
                let result = self.eval_atom(atom, text, effective_lo)?;
                let next = if self.preserve_order && atom.kind == AtomKind::Fuzzy {
                    result.path.last().map_or(lo, |last| last + 1)
                } else {
                    lo
                };
                Some((result, next))
            }
        }
    }

    fn eval_atom(&self, atom: &Atom, text: &str, lo: usize) -> Option<MatchResult> {
        match atom.kind {
            AtomKind::Fuzzy => scoring::score_from(&atom.text, text, lo, &self.score_opts(atom)),
            AtomKind::Phrase => self.eval_phrase(atom, text),
            AtomKind::Exact => self.eval_exact(atom, text),
        }
    }

    fn score_opts<'a>(&'a self, atom: &Atom) -> ScoreOpts<'a> {
        ScoreOpts {
            case_fold: !atom.case_sensitive,
            max_symbol_dist: self.max_symbol_dist,
            gap_penalty: self.gap_penalty,
            word_delims: &self.word_delims,
        }
    }

    /// Leftmost contiguous occurrence of the phrase body.
    fn eval_phrase(&self, atom: &Atom, text: &str) -> Option<MatchResult> {
        if atom.text.is_empty() {
            return Some(MatchResult::empty());
        }
        let start = find_occurrence(text, &atom.text, atom.case_sensitive)?;
        let len = atom.text.len();
        let word_start = start == 0 || self.word_delims.contains(&text.as_bytes()[start - 1]);
        let lead = if word_start {
            weights::WORD_START
        } else {
            weights::BASE
        };
        Some(MatchResult {
            score: lead + weights::BASE * (len - 1) as f64,
            path: (start..start + len).collect(),
        })
    }

    /// Whole-line equality, or one-sided equality when anchored.
    fn eval_exact(&self, atom: &Atom, text: &str) -> Option<MatchResult> {
        if atom.text.is_empty() {
            return if atom.anchor_prefix != atom.anchor_suffix || text.is_empty() {
                Some(MatchResult::empty())
            } else {
                None
            };
        }

        let needle = fold_for(&atom.text, atom.case_sensitive);
        let needle: &str = &needle;
        let hay = fold_for(text, atom.case_sensitive);
        let hay: &str = &hay;
        let start = match (atom.anchor_prefix, atom.anchor_suffix) {
            (true, false) => hay.starts_with(needle).then_some(0)?,
            (false, true) => hay
                .ends_with(needle)
                .then(|| text.len() - atom.text.len())?,
            _ => (hay == needle).then_some(0)?,
        };

        let bytes = text.as_bytes();
        let mut score = 0.0;
        let mut prev = None;
        let mut path = Vec::with_capacity(atom.text.len());
        for pos in start..start + atom.text.len() {
            score += scoring::witness_bonus(bytes, pos, prev, &self.word_delims);
            prev = Some(pos);
            path.push(pos);
        }
        Some(MatchResult { score, path })
    }

    /// Acceptance probe for a negated atom.
    ///
    /// A negated fuzzy atom excludes lines containing its body as a whole
    /// delimiter-bounded word; inverse subsequence matching would exclude
    /// nearly everything. Phrase and exact atoms invert their own probes.
    fn probe_negated(&self, atom: &Atom, text: &str) -> bool {
        match atom.kind {
            AtomKind::Fuzzy => self.contains_word(text, &atom.text, atom.case_sensitive),
            _ => self.eval_atom(atom, text, 0).is_some(),
        }
    }

    fn contains_word(&self, text: &str, word: &str, case_sensitive: bool) -> bool {
        if word.is_empty() {
            return true;
        }
        let hay = fold_for(text, case_sensitive);
        let hay: &str = &hay;
        let needle = fold_for(word, case_sensitive);
        let needle: &str = &needle;
        let bytes = text.as_bytes();
        let mut from = 0;
        while let Some(found) = hay[from..].find(needle) {
            let start = from + found;
            let end = start + needle.len();
            let left_ok = start == 0 || self.word_delims.contains(&bytes[start - 1]);
            let right_ok = end == bytes.len() || self.word_delims.contains(&bytes[end]);
            if left_ok && right_ok {
                return true;
            }
            from = start + 1;
        }
        false
    }
}

fn find_occurrence(text: &str, needle: &str, case_sensitive: bool) -> Option<usize> {
    if case_sensitive {
        text.find(needle)
    } else {
        text.to_ascii_lowercase().find(&needle.to_ascii_lowercase())
    }
}

fn fold_for(s: &str, case_sensitive: bool) -> std::borrow::Cow<'_, str> {
    if case_sensitive {
        std::borrow::Cow::Borrowed(s)
    } else {
        std::borrow::Cow::Owned(s.to_ascii_lowercase())
    }
}
