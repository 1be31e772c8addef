/// Environment variable names used by this crate to configure test
/// capture without touching test code.
///
/// These are purely helpers; the spy itself never reads the environment.

/// Echo captured `tracing` events to stdout as well (`1`, `true`, `yes`).
pub const LOGTEST_STDOUT_ENV: &str = "LOGTEST_STDOUT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag; unset or unrecognised values are `false`.
pub fn env_flag(key: &str) -> bool {
    parse_flag(&env_or(key, ""))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
