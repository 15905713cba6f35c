/// Check if any version flag is present before an end-of-flags marker.
pub fn has_version_flag(args: &[String]) -> bool {
    args.iter()
        .take_while(|arg| *arg != "--")
        .any(|arg| arg == "--version" || arg == "-V")
}

/// Check if any help flag is present before an end-of-flags marker.
pub fn has_help_flag(args: &[String]) -> bool {
    args.iter()
        .take_while(|arg| *arg != "--")
        .any(|arg| arg == "--help" || arg == "-h")
}
