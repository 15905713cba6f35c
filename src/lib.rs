//! # lf - line filter
//!
//! A line-oriented fuzzy search filter. Lines are read from files or
//! standard input, evaluated against a structured query, and the top-K
//! scoring lines come back with the matched byte offsets for highlighting.
//!
//! The query language composes fuzzy atoms with phrases (`"a b"`),
//! anchors (`^x`, `x$`, `=x`), negation (`!x`), OR (`|`), and parentheses;
//! juxtaposition is AND.
//!
//! ## Quick start
//!
//! ```rust
//! use lf::config::SearchArgs;
//! use lf::fuzzy::FilterTree;
//! use lf::query::parse;
//!
//! let args = SearchArgs::default();
//! let query = parse("abc !zzz", args.ignore_case, args.smart_case).unwrap();
//! let tree = FilterTree::new(query, &args);
//!
//! let hit = tree.eval("some abc line").unwrap();
//! assert_eq!(hit.path, vec![5, 6, 7]);
//! assert!(tree.eval("no match here").is_none());
//! ```
//!
//! The full pipeline (input files, batching, parallel scan, top-K) lives
//! behind [`fuzzy::run_search`]; the `lf` binary is a thin wrapper over
//! [`cli_main`].

// === Internal Modules ===
pub mod cli;
pub mod config;
pub mod fuzzy;
pub mod input;
pub mod output;
pub mod query;

// === Public API Exports ===

/// Search configuration, built once per run and shared by every worker.
pub use config::{GapPenalty, SearchArgs};

/// A compiled query, ready to evaluate lines.
pub use fuzzy::FilterTree;

/// Run a full search: parse, scan, collect top-K.
pub use fuzzy::{run_search, SearchResults};

/// Entry point used by the `lf` binary.
pub use cli::cli_main;

// === Public Functions ===

/// Get build information including version and build timestamp.
/// Returns a short string like: lf v0.3.2 (built: 2024-07-11)
pub fn get_build_info() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let build_timestamp = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("");
    let date = build_timestamp.split('T').next().unwrap_or("");
    if date.is_empty() {
        format!("lf v{version}")
    } else {
        format!("lf v{version} (built: {date})")
    }
}
