pub mod filter;
pub mod scanner;
pub mod scoring;
pub mod topk;

pub use filter::FilterTree;
pub use scanner::{run_search, SearchResults};
pub use scoring::{MatchResult, ScoreOpts};
pub use topk::{ScoredLine, TopK};
