//! Citation metrics endpoint.

use crate::client::AdsClient;
use crate::error::Result;
use crate::parse::{ApiResponse, MetricsResponse};
use crate::session::Session;
use serde_json::Value;

/// Metrics request for a set of bibcodes.
///
/// The payload is returned as the service sent it.
pub struct MetricsQuery {
    session: Session,
    bibcodes: Vec<String>,
    response: Option<MetricsResponse>,
}

impl MetricsQuery {
    pub fn new<I, S>(client: AdsClient, bibcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            session: Session::new(client),
            bibcodes: bibcodes.into_iter().map(Into::into).collect(),
            response: None,
        }
    }

    pub fn bibcodes(&self) -> &[String] {
        &self.bibcodes
    }

    /// Last response, `None` before [`execute`](Self::execute).
    pub fn response(&self) -> Option<&MetricsResponse> {
        self.response.as_ref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    /// POST the bibcodes to the metrics service and return the decoded payload.
    pub fn execute(&mut self) -> Result<&Value> {
        let payload = serde_json::json!({ "bibcodes": self.bibcodes });
        let metrics_url = self.session.client().config.metrics_url.clone();
        let http = self.session.transport()?.post_json(&metrics_url, &payload)?;
        let response = MetricsResponse::load_http_response(http)?;
        Ok(&self.response.insert(response).metrics)
    }
}
