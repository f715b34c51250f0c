const SEPARATORS: [char; 3] = ['/', '-', '.'];

/// Derives the environment variable name for a parameter: the last segment of
/// the name once `-` and `.` are treated like `/`, uppercased.
///
/// `/myapp/db-host.port` becomes `PORT`. Names made only of separators give
/// an empty string.
pub fn env_var_name(full_name: &str) -> String {
    full_name
        .split(SEPARATORS)
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_uppercase)
        .unwrap_or_default()
}
