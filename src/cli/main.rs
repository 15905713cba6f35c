use std::env;

use tracing_subscriber::EnvFilter;

use crate::cli::args::{has_help_flag, has_version_flag};
use crate::config;
use crate::fuzzy::scanner::run_search;
use crate::get_build_info;
use crate::output;

/// Exit code for query parse and argument errors.
const EXIT_USAGE: i32 = 2;
/// Exit code when no input source could be read.
const EXIT_IO: i32 = 1;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI and return the process exit code.
pub fn cli_main() -> i32 {
    let args: Vec<String> = env::args().collect();
    cli_main_from(&args)
}

/// Run the CLI against an explicit argument vector (including the program
/// name). Split out from `cli_main` so the dispatch is testable.
pub fn cli_main_from(args: &[String]) -> i32 {
    if has_version_flag(args) {
        println!("{}", get_build_info());
        return 0;
    }
    if has_help_flag(args) {
        config::print_usage();
        return 0;
    }

    init_tracing();

    let search_args = match config::parse_args_from(args) {
        Ok(search_args) => search_args,
        Err(message) => {
            eprintln!("lf: {message}");
            config::print_usage();
            return EXIT_USAGE;
        }
    };

    let results = match run_search(&search_args) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("lf: {err}");
            return EXIT_USAGE;
        }
    };

    output::print_results(&results, &search_args);

    if search_args.filenames.is_empty() || results.sources_ok > 0 {
        0
    } else {
        EXIT_IO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn version_flag_short_circuits() {
        assert_eq!(cli_main_from(&to_args(&["lf", "-V"])), 0);
        assert_eq!(cli_main_from(&to_args(&["lf", "--version", "query"])), 0);
    }

    #[test]
    fn help_flag_short_circuits() {
        assert_eq!(cli_main_from(&to_args(&["lf", "-h"])), 0);
    }

    #[test]
    fn missing_query_is_a_usage_error() {
        assert_eq!(cli_main_from(&to_args(&["lf"])), EXIT_USAGE);
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        assert_eq!(cli_main_from(&to_args(&["lf", "--bogus", "q"])), EXIT_USAGE);
    }

    #[test]
    fn malformed_query_is_a_usage_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        file.write_all(b"line\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(
            cli_main_from(&to_args(&["lf", "\"open", &path])),
            EXIT_USAGE
        );
    }

    #[test]
    fn unreadable_input_is_an_io_error() {
        assert_eq!(
            cli_main_from(&to_args(&["lf", "-c", "-S", "q", "no/such/file"])),
            EXIT_IO
        );
    }

    #[test]
    fn readable_file_among_unreadable_still_succeeds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        file.write_all(b"sample line\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(
            cli_main_from(&to_args(&["lf", "-c", "-S", "zzzqqq", "no/such/file", &path])),
            0
        );
    }
}
