//! Shared client handle.

use crate::config::Config;
use crate::credentials::{CredentialSource, SystemCredentials};
use crate::metrics::MetricsQuery;
use crate::search::SearchQueryBuilder;
use crate::transport::{Connector, ReqwestConnector};
use std::fmt;
use std::sync::Arc;

/// Entry point for building ADS queries.
///
/// A client only holds immutable configuration and the means to open
/// connections. Every query built from it resolves its own token and opens
/// its own session.
///
/// # Example
///
/// ```no_run
/// # fn example() -> ads_client::error::Result<()> {
/// use ads_client::{AdsClient, Advance};
///
/// let client = AdsClient::default();
/// let mut query = client.search("author:\"Einstein\" year:1905").rows(10).build()?;
/// while let Advance::Record(paper) = query.next_record()? {
///     println!("{}", paper);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AdsClient {
    pub(crate) config: Arc<Config>,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) credentials: Arc<dyn CredentialSource>,
    pub(crate) token: Option<String>,
}

impl AdsClient {
    /// Create a client that talks HTTP through `reqwest` and reads tokens
    /// from the process environment and token files.
    pub fn new(config: Config) -> Self {
        let connector = ReqwestConnector::new(config.timeout);
        Self {
            config: Arc::new(config),
            connector: Arc::new(connector),
            credentials: Arc::new(SystemCredentials),
            token: None,
        }
    }

    /// Use this token for every query instead of looking one up.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override how HTTP sessions are opened.
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Override where tokens are looked up.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start building a paginated search for `q`.
    pub fn search(&self, q: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(self.clone()).q(q)
    }

    /// Build a metrics query for the given bibcodes.
    pub fn metrics<I, S>(&self, bibcodes: I) -> MetricsQuery
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MetricsQuery::new(self.clone(), bibcodes)
    }
}

impl Default for AdsClient {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for AdsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdsClient")
            .field("config", &self.config)
            .field("token", &self.token.as_ref().map(|_| "<set>"))
            .finish_non_exhaustive()
    }
}
