//! Result formatting: columns, highlighting, and the count footer.

use crate::config::SearchArgs;
use crate::fuzzy::scanner::SearchResults;
use crate::fuzzy::topk::ScoredLine;

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Wrap every byte at a path offset in ANSI red.
///
/// Offsets always point at the first byte of a character (matching is
/// ASCII), so the walk is over characters with a cursor into the sorted
/// path.
pub fn highlight(text: &str, path: &[usize]) -> String {
    if path.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + path.len() * (RED.len() + RESET.len()));
    let mut next = 0;
    for (idx, ch) in text.char_indices() {
        let end = idx + ch.len_utf8();
        while next < path.len() && path[next] < idx {
            next += 1;
        }
        if next < path.len() && path[next] < end {
            out.push_str(RED);
            out.push(ch);
            out.push_str(RESET);
        } else {
            out.push(ch);
        }
    }
    out
}

/// Format one result as `[score ] [filename ] [lineno ] text`.
pub fn format_result_line(line: &ScoredLine, args: &SearchArgs) -> String {
    let mut out = String::new();
    if args.show_score {
        out.push_str(&format!("{:.2} ", line.result.score));
    }
    if !(args.trim_empty && line.record.filename.is_empty()) {
        out.push_str(&line.record.filename);
        out.push(' ');
    }
    if args.show_line {
        out.push_str(&format!("{} ", line.record.lineno));
    }
    if args.show_color {
        out.push_str(&highlight(&line.record.text, &line.result.path));
    } else {
        out.push_str(&line.record.text);
    }
    out
}

/// Print the retained results and, when enabled, the total-match footer.
pub fn print_results(results: &SearchResults, args: &SearchArgs) {
    for line in &results.lines {
        println!("{}", format_result_line(line, args));
    }
    if args.show_count {
        println!("{}", results.matched);
    }
}
