//! Runtime configuration from environment variables

use std::env;
use std::path::PathBuf;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_AUTH_FILE: &str = "hantel-auth.json";

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Path of the file holding the stored login credentials
    pub auth_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let base_url = env::var("HANTEL_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let auth_file = env::var("HANTEL_AUTH_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_AUTH_FILE));

        Self {
            base_url,
            auth_file,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_file: PathBuf::from(DEFAULT_AUTH_FILE),
        }
    }
}
