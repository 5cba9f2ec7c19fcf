//! Per-query token and HTTP session.

use crate::client::AdsClient;
use crate::credentials::resolve_token;
use crate::error::Result;
use crate::transport::{session_headers, Transport};
use std::cell::OnceCell;

/// Lazily resolved token and lazily opened transport, owned by one query.
pub(crate) struct Session {
    client: AdsClient,
    token: OnceCell<Option<String>>,
    transport: Option<Box<dyn Transport>>,
}

impl Session {
    pub fn new(client: AdsClient) -> Self {
        let token = match &client.token {
            Some(token) => OnceCell::from(Some(token.clone())),
            None => OnceCell::new(),
        };
        Self {
            client,
            token,
            transport: None,
        }
    }

    pub fn client(&self) -> &AdsClient {
        &self.client
    }

    /// The API token, looked up on first use.
    pub fn token(&self) -> Option<&str> {
        self.token
            .get_or_init(|| resolve_token(&self.client.config, self.client.credentials.as_ref()))
            .as_deref()
    }

    /// Set the token explicitly. Has no effect on an already opened transport.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = OnceCell::from(Some(token.into()));
    }

    /// The transport, opened with the session headers on first use.
    pub fn transport(&mut self) -> Result<&dyn Transport> {
        let transport = match self.transport.take() {
            Some(transport) => transport,
            None => {
                let headers = session_headers(self.token(), &self.client.config.user_agent)?;
                self.client.connector.connect(headers)?
            }
        };
        Ok(&**self.transport.insert(transport))
    }
}
