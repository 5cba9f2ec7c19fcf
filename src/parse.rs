//! ADS API response parsing.
//!
//! Search responses are Solr envelopes. Every required key is checked up
//! front; a missing key rejects the whole envelope.

use crate::client::AdsClient;
use crate::error::{AdsError, Result};
use crate::rate_limit::RateLimits;
use crate::record::Record;
use crate::transport::HttpResponse;
use serde_json::{Map, Value};
use std::cell::OnceCell;

/// A decoded API response that can be built from an HTTP response.
pub trait ApiResponse: Sized {
    /// Decode a raw response body.
    fn parse(raw: &str) -> Result<Self>;

    /// Keep the HTTP response this was decoded from.
    fn attach(&mut self, http: HttpResponse);

    fn http_response(&self) -> Option<&HttpResponse>;

    /// Reject non-2xx responses, otherwise parse the body and attach the response.
    fn load_http_response(http: HttpResponse) -> Result<Self> {
        if !http.is_success() {
            return Err(AdsError::Api {
                status: http.status,
                message: http.body,
            });
        }
        let mut parsed = Self::parse(&http.body)?;
        parsed.attach(http);
        Ok(parsed)
    }

    /// Rate-limit headers of the attached HTTP response.
    fn ratelimits(&self) -> Option<RateLimits> {
        self.http_response().map(HttpResponse::ratelimits)
    }
}

/// One page of search results.
#[derive(Debug)]
pub struct SolrResponse {
    json: Value,
    response_header: Value,
    params: Value,
    num_found: u64,
    docs: Vec<Map<String, Value>>,
    articles: OnceCell<Vec<Record>>,
    client: Option<AdsClient>,
    http: Option<HttpResponse>,
}

fn require<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    value.get(key).ok_or_else(|| AdsError::ResponseParse {
        key: key.to_string(),
    })
}

impl SolrResponse {
    /// Bind the records produced by [`articles`](Self::articles) to a client
    /// so their missing fields can be fetched.
    pub fn set_client(&mut self, client: AdsClient) {
        self.client = Some(client);
    }

    /// The full decoded body.
    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn response_header(&self) -> &Value {
        &self.response_header
    }

    /// Request parameters echoed back by the server.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Total number of matches for the query, across all pages.
    pub fn num_found(&self) -> u64 {
        self.num_found
    }

    /// Raw documents of this page.
    pub fn docs(&self) -> &[Map<String, Value>] {
        &self.docs
    }

    /// Documents of this page wrapped as records. Built once.
    pub fn articles(&self) -> &[Record] {
        self.articles.get_or_init(|| {
            self.docs
                .iter()
                .map(|doc| Record::from_doc(doc.clone(), self.client.clone()))
                .collect()
        })
    }
}

impl ApiResponse for SolrResponse {
    fn parse(raw: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(raw)?;

        let response_header = require(&json, "responseHeader")?.clone();
        let params = require(&response_header, "params")?.clone();
        let response = require(&json, "response")?;
        let num_found = require(response, "numFound")?
            .as_u64()
            .ok_or_else(|| AdsError::Parse("numFound is not a non-negative integer".into()))?;
        let docs = require(response, "docs")?
            .as_array()
            .ok_or_else(|| AdsError::Parse("docs is not an array".into()))?
            .iter()
            .map(|doc| match doc {
                Value::Object(map) => Ok(map.clone()),
                other => Err(AdsError::Parse(format!("document is not an object: {}", other))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            json,
            response_header,
            params,
            num_found,
            docs,
            articles: OnceCell::new(),
            client: None,
            http: None,
        })
    }

    fn attach(&mut self, http: HttpResponse) {
        self.http = Some(http);
    }

    fn http_response(&self) -> Option<&HttpResponse> {
        self.http.as_ref()
    }
}

/// Metrics service response. The payload is decoded but not validated.
#[derive(Debug, Clone)]
pub struct MetricsResponse {
    pub metrics: Value,
    http: Option<HttpResponse>,
}

impl ApiResponse for MetricsResponse {
    fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            metrics: serde_json::from_str(raw)?,
            http: None,
        })
    }

    fn attach(&mut self, http: HttpResponse) {
        self.http = Some(http);
    }

    fn http_response(&self) -> Option<&HttpResponse> {
        self.http.as_ref()
    }
}
