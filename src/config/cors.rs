use serde::Deserialize;
use std::path::PathBuf;

/// Default location of the CORS rules file
pub const DEFAULT_CORSFILE: &str = "Corsfile";

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Path of the Corsfile holding the `cors` directives
    pub config_path: PathBuf,
}
