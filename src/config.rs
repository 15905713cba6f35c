use std::env;

/// Cost function applied to the gap between two consecutive match witnesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPenalty {
    /// 0.1 per skipped byte.
    Linear,
    /// 0.5 * ln(1 + skipped bytes).
    Log,
}

/// Search configuration, immutable after construction.
///
/// Built once from the command line and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct SearchArgs {
    /// The raw query string.
    pub q: String,
    /// Compare under ASCII lowercase on both sides.
    pub ignore_case: bool,
    /// An atom containing an uppercase byte becomes case-sensitive.
    pub smart_case: bool,
    /// Number of top results to retain.
    pub topk: usize,
    /// Input files; empty means standard input.
    pub filenames: Vec<String>,
    /// Evaluate batches on a worker pool.
    pub parallel: bool,
    /// Fuzzy atoms of an AND must match in query order.
    pub preserve_order: bool,
    /// Lines per unit of (parallel) work.
    pub batch_size: usize,
    /// Maximum distance between two consecutive witnesses; `usize::MAX` is unbounded.
    pub max_symbol_dist: usize,
    pub gap_penalty: GapPenalty,
    /// Bytes treated as word boundaries for bonus scoring.
    pub word_delims: String,
    pub show_color: bool,
    pub show_count: bool,
    pub show_score: bool,
    pub show_line: bool,
    pub trim_empty: bool,
}

impl Default for SearchArgs {
    fn default() -> Self {
        Self {
            q: String::new(),
            ignore_case: true,
            smart_case: true,
            topk: 100,
            filenames: Vec::new(),
            parallel: false,
            preserve_order: false,
            batch_size: 10_000,
            max_symbol_dist: 10,
            gap_penalty: GapPenalty::Linear,
            word_delims: ":;,./-_ \t".to_string(),
            show_color: true,
            show_count: true,
            show_score: true,
            show_line: true,
            trim_empty: false,
        }
    }
}

/// Split a flag token into its name and an attached value, if any.
///
/// `--topk=10` becomes `("--topk", Some("10"))` and `-k10` becomes
/// `("-k", Some("10"))`; plain flags come back unchanged.
fn split_flag(arg: &str) -> (&str, Option<&str>) {
    if let Some(rest) = arg.strip_prefix("--") {
        match rest.split_once('=') {
            Some((name, value)) => (&arg[..name.len() + 2], Some(value)),
            None => (arg, None),
        }
    } else if arg.len() > 2 {
        (&arg[..2], Some(&arg[2..]))
    } else {
        (arg, None)
    }
}

fn take_value(
    name: &str,
    inline: Option<&str>,
    args: &[String],
    i: &mut usize,
) -> Result<String, String> {
    if let Some(value) = inline {
        return Ok(value.to_string());
    }
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.clone()),
        None => Err(format!("missing value for '{name}'")),
    }
}

fn reject_value(name: &str, inline: Option<&str>) -> Result<(), String> {
    match inline {
        Some(_) => Err(format!("flag '{name}' takes no value")),
        None => Ok(()),
    }
}

fn parse_count(value: &str, name: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!(
            "invalid value '{value}' for '{name}': expected a positive integer"
        )),
    }
}

/// Parse command line arguments (including the program name) into SearchArgs.
///
/// The first positional argument is the query; any further positionals are
/// input files. `--` ends flag processing.
pub fn parse_args_from(args: &[String]) -> Result<SearchArgs, String> {
    let mut search_args = SearchArgs::default();
    let mut positionals: Vec<String> = Vec::new();
    let mut end_of_flags = false;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        if end_of_flags || !arg.starts_with('-') || arg == "-" {
            positionals.push(arg.clone());
            i += 1;
            continue;
        }
        if arg == "--" {
            end_of_flags = true;
            i += 1;
            continue;
        }

        let (name, inline) = split_flag(arg);
        match name {
            "-i" | "--ignore-case" => {
                reject_value(name, inline)?;
                search_args.ignore_case = true;
                search_args.smart_case = false;
            }
            "-I" | "--no-ignore-case" => {
                reject_value(name, inline)?;
                search_args.ignore_case = false;
                search_args.smart_case = false;
            }
            "-p" | "--parallel" => {
                reject_value(name, inline)?;
                search_args.parallel = true;
            }
            "-o" | "--preserve-order" => {
                reject_value(name, inline)?;
                search_args.preserve_order = true;
            }
            "-C" | "--no-color" => {
                reject_value(name, inline)?;
                search_args.show_color = false;
            }
            "-S" | "--no-score" => {
                reject_value(name, inline)?;
                search_args.show_score = false;
            }
            "-c" | "--no-count" => {
                reject_value(name, inline)?;
                search_args.show_count = false;
            }
            "-l" | "--no-line" => {
                reject_value(name, inline)?;
                search_args.show_line = false;
            }
            "-t" | "--trim-empty-filenames" => {
                reject_value(name, inline)?;
                search_args.trim_empty = true;
            }
            "-k" | "--topk" => {
                let value = take_value(name, inline, args, &mut i)?;
                search_args.topk = parse_count(&value, name)?;
            }
            "--batch-size" => {
                let value = take_value(name, inline, args, &mut i)?;
                search_args.batch_size = parse_count(&value, name)?;
            }
            "-s" | "--max-symbol-gap" => {
                let value = take_value(name, inline, args, &mut i)?;
                let dist = value.parse::<i64>().map_err(|_| {
                    format!("invalid value '{value}' for '{name}': expected an integer")
                })?;
                // N below 1 lifts the bound entirely.
                search_args.max_symbol_dist = if dist < 1 {
                    usize::MAX
                } else {
                    dist as usize
                };
            }
            "-g" | "--gap-penalty" => {
                let value = take_value(name, inline, args, &mut i)?;
                search_args.gap_penalty = match value.as_str() {
                    "linear" => GapPenalty::Linear,
                    "log" => GapPenalty::Log,
                    _ => {
                        return Err(format!(
                            "invalid value '{value}' for '{name}': expected 'linear' or 'log'"
                        ))
                    }
                };
            }
            "-d" | "--word-delims" => {
                search_args.word_delims = take_value(name, inline, args, &mut i)?;
            }
            _ => return Err(format!("unknown flag '{arg}'")),
        }
        i += 1;
    }

    let mut positionals = positionals.into_iter();
    match positionals.next() {
        Some(q) => search_args.q = q,
        None => return Err("query not given".to_string()),
    }
    search_args.filenames = positionals.collect();

    Ok(search_args)
}

/// Parse command line arguments from the environment.
pub fn parse_args() -> Result<SearchArgs, String> {
    let args: Vec<String> = env::args().collect();
    parse_args_from(&args)
}

/// Print usage information for the command line tool.
pub fn print_usage() {
    eprintln!("Usage: lf [OPTIONS] QUERY [FILE...]");
    eprintln!();
    eprintln!("Reads lines from FILEs (or standard input), ranks the ones matching");
    eprintln!("QUERY, and prints the best matches with the matched bytes highlighted.");
    eprintln!();
    eprintln!("Query syntax:");
    eprintln!("  abc          fuzzy subsequence match");
    eprintln!("  ^abc abc$    prefix / suffix anchored match");
    eprintln!("  =abc ^abc$   exact match");
    eprintln!("  \"a b\"        phrase (contiguous bytes)");
    eprintln!("  !abc         negation");
    eprintln!("  a b          both must match (AND)");
    eprintln!("  a | b        either may match (OR)");
    eprintln!("  ( ... )      grouping");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -k, --topk N            retain top N results (default 100)");
    eprintln!("  -i, --ignore-case       force case-insensitive matching");
    eprintln!("  -I, --no-ignore-case    force case-sensitive matching");
    eprintln!("  -p, --parallel          evaluate batches on a worker pool");
    eprintln!("  -o, --preserve-order    fuzzy AND atoms must match in query order");
    eprintln!("      --batch-size N      lines per batch (default 10000)");
    eprintln!("  -s, --max-symbol-gap N  witness distance bound; N<=0 unbounded (default 10)");
    eprintln!("  -g, --gap-penalty KIND  gap cost function: linear or log (default linear)");
    eprintln!("  -d, --word-delims STR   bytes treated as word boundaries");
    eprintln!("  -C, --no-color          disable ANSI highlighting");
    eprintln!("  -S, --no-score          hide the score column");
    eprintln!("  -c, --no-count          hide the total-match count footer");
    eprintln!("  -l, --no-line           hide the line-number column");
    eprintln!("  -t, --trim-empty-filenames  omit empty filename fields");
    eprintln!("  -h, --help              show this help message");
    eprintln!("  -V, --version           show version information");
}
