//! API token discovery.
//!
//! Tokens are looked up in the environment first, then in plaintext token
//! files. A missing token is not an error: requests are still sent, and
//! endpoints that require authentication reject them.

use crate::config::Config;
use std::path::Path;

/// Where tokens are read from.
pub trait CredentialSource: Send + Sync {
    /// Value of an environment variable, if set.
    fn env_var(&self, name: &str) -> Option<String>;

    /// Contents of a token file, if it can be read.
    fn read_file(&self, path: &Path) -> Option<String>;
}

/// Reads the real process environment and filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCredentials;

impl CredentialSource for SystemCredentials {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }
}

/// Resolve an API token from `config.token_env_vars`, then `config.token_files`.
///
/// The first non-empty value wins. File contents are trimmed.
pub fn resolve_token(config: &Config, source: &dyn CredentialSource) -> Option<String> {
    for name in &config.token_env_vars {
        if let Some(token) = source.env_var(name).filter(|t| !t.is_empty()) {
            tracing::debug!(var = %name, "using token from environment");
            return Some(token);
        }
    }

    for path in &config.token_files {
        if let Some(contents) = source.read_file(path) {
            let token = contents.trim();
            if !token.is_empty() {
                tracing::debug!(path = %path.display(), "using token from file");
                return Some(token.to_string());
            }
        }
    }

    tracing::warn!("No token found");
    None
}
