// This is the CLI entry point for lf
fn main() {
    std::process::exit(lf::cli_main());
}
