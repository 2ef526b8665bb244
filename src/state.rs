use std::path::PathBuf;

/// Application state shared across all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Corsfile the rules were loaded from
    pub config_path: PathBuf,

    /// Number of CORS rules in effect
    pub rule_count: usize,
}
