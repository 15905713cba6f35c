//! Fuzzy subsequence matching and scoring.
//!
//! A fuzzy atom matches a line when its bytes occur in order as a
//! subsequence, with no more than `max_symbol_dist` bytes between two
//! consecutive chosen positions. Among all feasible position choices the
//! scorer picks the one maximizing:
//!
//! - a per-position bonus: word start > camelCase hump > consecutive run >
//!   plain match;
//! - minus a gap penalty (linear or logarithmic in the skipped bytes);
//! - minus a small length correction that breaks ties toward shorter lines.
//!
//! The search is a dynamic program over candidate positions per query byte
//! with predecessor tracking, so the winning path comes back for
//! highlighting.

use crate::config::GapPenalty;

/// Scoring weights. A tight word-start prefix outranks a scattered match.
pub(crate) mod weights {
    /// Position at offset 0 or right after a word delimiter.
    pub const WORD_START: f64 = 4.0;
    /// Uppercase position following a lowercase byte.
    pub const CAMEL: f64 = 3.0;
    /// Position immediately after the previous chosen position.
    pub const CONSECUTIVE: f64 = 2.0;
    /// Any other matching position.
    pub const BASE: f64 = 1.0;
    /// Per skipped byte under `GapPenalty::Linear`.
    pub const GAP_LINEAR: f64 = 0.1;
    /// Scale for `ln(1 + skipped)` under `GapPenalty::Log`.
    pub const GAP_LOG: f64 = 0.5;
    /// Per byte of line length beyond the query length.
    pub const LENGTH: f64 = 0.001;
}

/// Result of a successful match: a score and the chosen byte offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Higher is better; always finite.
    pub score: f64,
    /// Strictly ascending byte offsets witnessing the match.
    pub path: Vec<usize>,
}

impl MatchResult {
    /// The zero-score result of an empty match.
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            path: Vec::new(),
        }
    }
}

/// Per-atom scoring options.
#[derive(Debug, Clone, Copy)]
pub struct ScoreOpts<'a> {
    /// Compare under ASCII lowercase on both sides.
    pub case_fold: bool,
    /// Maximum distance between consecutive witnesses; `usize::MAX` is unbounded.
    pub max_symbol_dist: usize,
    pub gap_penalty: GapPenalty,
    /// Bytes that start a new word.
    pub word_delims: &'a [u8],
}

/// Bonus for choosing `pos` as a witness, given the previously chosen
/// position. The highest applicable bonus wins; `line` carries the
/// original (unfolded) bytes so camelCase humps survive case folding.
pub(crate) fn witness_bonus(line: &[u8], pos: usize, prev: Option<usize>, delims: &[u8]) -> f64 {
    if pos == 0 || delims.contains(&line[pos - 1]) {
        weights::WORD_START
    } else if line[pos].is_ascii_uppercase() && line[pos - 1].is_ascii_lowercase() {
        weights::CAMEL
    } else if prev == Some(pos - 1) {
        weights::CONSECUTIVE
    } else {
        weights::BASE
    }
}

fn gap_cost(gap: usize, penalty: GapPenalty) -> f64 {
    if gap == 0 {
        return 0.0;
    }
    match penalty {
        GapPenalty::Linear => weights::GAP_LINEAR * gap as f64,
        GapPenalty::Log => weights::GAP_LOG * (1.0 + gap as f64).ln(),
    }
}

/// Score `query` as a fuzzy subsequence of `line`.
pub fn score(query: &str, line: &str, opts: &ScoreOpts) -> Option<MatchResult> {
    score_from(query, line, 0, opts)
}

/// Score `query` against `line` with every witness at offset `lo` or later.
///
/// The lower bound is how order preservation across an AND chain is
/// enforced: each fuzzy atom starts after the previous atom's last witness.
pub fn score_from(query: &str, line: &str, lo: usize, opts: &ScoreOpts) -> Option<MatchResult> {
    let qbytes = query.as_bytes();
    let lbytes = line.as_bytes();
    let m = qbytes.len();
    let n = lbytes.len();

    if m == 0 {
        return Some(MatchResult::empty());
    }
    if n == 0 || lo >= n || n - lo < m {
        return None;
    }

    let fold = |b: u8| if opts.case_fold { b.to_ascii_lowercase() } else { b };

    // Candidate positions per query byte, all at or after the lower bound.
    let mut candidates: Vec<Vec<usize>> = Vec::with_capacity(m);
    for &qb in qbytes {
        let want = fold(qb);
        let positions: Vec<usize> = (lo..n).filter(|&j| fold(lbytes[j]) == want).collect();
        if positions.is_empty() {
            return None;
        }
        candidates.push(positions);
    }

    // dp[j]: best score ending with query byte i at candidates[i][j].
    // prev_indices[i][j]: index into candidates[i-1] that achieved it.
    let mut dp: Vec<f64> = candidates[0]
        .iter()
        .map(|&pos| witness_bonus(lbytes, pos, None, opts.word_delims))
        .collect();
    let mut prev_indices: Vec<Vec<usize>> = vec![vec![usize::MAX; candidates[0].len()]];

    for i in 1..m {
        let curr = &candidates[i];
        let prev = &candidates[i - 1];
        let mut new_dp = vec![f64::NEG_INFINITY; curr.len()];
        let mut new_prev = vec![usize::MAX; curr.len()];

        for (cj, &cur_pos) in curr.iter().enumerate() {
            for (pj, &prev_pos) in prev.iter().enumerate() {
                if prev_pos >= cur_pos {
                    break;
                }
                if cur_pos - prev_pos > opts.max_symbol_dist {
                    continue;
                }
                let prev_score = dp[pj];
                if prev_score == f64::NEG_INFINITY {
                    continue;
                }
                let bonus = witness_bonus(lbytes, cur_pos, Some(prev_pos), opts.word_delims);
                let total = prev_score + bonus - gap_cost(cur_pos - prev_pos - 1, opts.gap_penalty);
                if total > new_dp[cj] {
                    new_dp[cj] = total;
                    new_prev[cj] = pj;
                }
            }
        }

        dp = new_dp;
        prev_indices.push(new_prev);
    }

    let (best_idx, best_score) = dp
        .iter()
        .enumerate()
        .fold((usize::MAX, f64::NEG_INFINITY), |acc, (j, &s)| {
            if s > acc.1 {
                (j, s)
            } else {
                acc
            }
        });
    if best_idx == usize::MAX {
        return None;
    }

    // Walk predecessors backwards to recover the chosen positions.
    let mut path = vec![0usize; m];
    let mut idx = best_idx;
    path[m - 1] = candidates[m - 1][idx];
    for i in (1..m).rev() {
        idx = prev_indices[i][idx];
        path[i - 1] = candidates[i - 1][idx];
    }

    let score = best_score - weights::LENGTH * (n - m) as f64;
    Some(MatchResult { score, path })
}
