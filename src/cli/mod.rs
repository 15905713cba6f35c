pub mod args;
pub mod main;

pub use args::{has_help_flag, has_version_flag};
pub use main::{cli_main, cli_main_from};
