//! Batch scanning: streaming input lines through the filter tree.

use rayon::prelude::*;
use tracing::debug;

use crate::config::SearchArgs;
use crate::fuzzy::filter::FilterTree;
use crate::fuzzy::topk::{ScoredLine, TopK};
use crate::input::{LineReader, LineRecord};
use crate::query::{parse, ParseError};

/// Outcome of one search run.
#[derive(Debug)]
pub struct SearchResults {
    /// Retained lines, best first; at most `topk` of them.
    pub lines: Vec<ScoredLine>,
    /// Total number of accepted lines, not capped at `topk`.
    pub matched: u64,
    /// Input sources that could be opened.
    pub sources_ok: usize,
    /// Input sources that could not be opened.
    pub sources_failed: usize,
}

/// Parse the query and scan every input line against it.
///
/// Lines are processed in batches of `batch_size`. A batch is evaluated
/// either sequentially or as a rayon data-parallel map; either way the
/// surviving lines are offered to the collector in input order, batch by
/// batch, so the two modes produce identical output.
pub fn run_search(args: &SearchArgs) -> Result<SearchResults, ParseError> {
    let query = parse(&args.q, args.ignore_case, args.smart_case)?;
    let tree = FilterTree::new(query, args);
    let mut reader = LineReader::open(&args.filenames);
    let mut collector = TopK::new(args.topk);

    let mut batch_index = 0u64;
    loop {
        let batch: Vec<LineRecord> = reader.by_ref().take(args.batch_size).collect();
        if batch.is_empty() {
            break;
        }
        let scanned = batch.len();
        let accepted = if args.parallel {
            scan_parallel(&tree, batch)
        } else {
            scan_sequential(&tree, batch)
        };
        debug!(
            batch = batch_index,
            scanned,
            accepted = accepted.len(),
            "batch evaluated"
        );
        for line in accepted {
            collector.offer(line);
        }
        batch_index += 1;
    }

    Ok(SearchResults {
        matched: collector.matched(),
        lines: collector.into_sorted(),
        sources_ok: reader.opened(),
        sources_failed: reader.failed(),
    })
}

fn scan_sequential(tree: &FilterTree, batch: Vec<LineRecord>) -> Vec<ScoredLine> {
    batch
        .into_iter()
        .filter_map(|record| {
            tree.eval(&record.text)
                .map(|result| ScoredLine { result, record })
        })
        .collect()
}

fn scan_parallel(tree: &FilterTree, batch: Vec<LineRecord>) -> Vec<ScoredLine> {
    batch
        .into_par_iter()
        .filter_map(|record| {
            tree.eval(&record.text)
                .map(|result| ScoredLine { result, record })
        })
        .collect()
}
