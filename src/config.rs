//! Client configuration: endpoints, token sources, and request defaults.

use crate::error::{AdsError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Base URL of the ADS API.
pub const DEFAULT_API_URL: &str = "https://api.adsabs.harvard.edu/v1";

/// Environment variables checked for an API token, in priority order.
pub const TOKEN_ENV_VARS: &[&str] = &["ADS_API_TOKEN", "ADS_DEV_KEY"];

/// Token files checked after the environment, relative to the home directory.
pub const TOKEN_FILES: &[&str] = &["~/.ads/token", "~/.ads/dev_key"];

/// Client identifier sent with every request.
pub const USER_AGENT: &str = concat!("ads-client/", env!("CARGO_PKG_VERSION"));

/// Endpoint and credential configuration shared by every query built from a client.
#[derive(Debug, Clone)]
pub struct Config {
    pub search_url: String,
    pub metrics_url: String,
    pub token_env_vars: Vec<String>,
    pub token_files: Vec<PathBuf>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: format!("{}/search/query", DEFAULT_API_URL),
            metrics_url: format!("{}/metrics", DEFAULT_API_URL),
            token_env_vars: TOKEN_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            token_files: TOKEN_FILES.iter().map(|f| expand_home(Path::new(f))).collect(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Point every endpoint at a different API root (useful for testing).
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        let parsed = Url::parse(api_url)
            .map_err(|e| AdsError::Config(format!("invalid API URL {api_url:?}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(AdsError::Config(format!(
                "API URL {api_url:?} cannot be used as a base"
            )));
        }
        let root = parsed.as_str().trim_end_matches('/');
        self.search_url = format!("{}/search/query", root);
        self.metrics_url = format!("{}/metrics", root);
        Ok(self)
    }

    /// Replace the environment variables consulted for a token.
    pub fn with_token_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token_env_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the token files. A leading `~/` is expanded to the home directory.
    pub fn with_token_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.token_files = files
            .into_iter()
            .map(|f| expand_home(f.as_ref()))
            .collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths are returned unchanged when there is no home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
