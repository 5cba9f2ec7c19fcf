//! In-memory ADS API used by the unit tests.

use crate::client::AdsClient;
use crate::config::Config;
use crate::credentials::CredentialSource;
use crate::error::Result;
use crate::transport::{Connector, HttpResponse, Transport};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Credential source backed by fixed maps.
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticCredentials {
    vars: HashMap<String, String>,
    files: HashMap<PathBuf, String>,
}

impl StaticCredentials {
    pub fn var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(PathBuf::from(path), contents.to_string());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn env_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }
}

/// Writer handing formatted log lines to a shared buffer.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return its result and the
/// warnings it logged.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (value, logs)
}

/// Full document number `i` (0-based) of the synthetic corpus.
pub(crate) fn mock_doc(i: usize) -> Value {
    json!({
        "id": (i + 1).to_string(),
        "bibcode": format!("2000Mock..{:04}", i + 1),
        "year": "2000",
        "first_author": "Author, A.",
        "author": ["Author, A.", "Other, B."],
        "title": [format!("Paper {}", i + 1)],
        "abstract": format!("Abstract {}", i + 1),
        "identifier": [format!("2301.{:05}", i + 1)],
        "citation_count": i,
    })
}

fn envelope(params: Value, num_found: usize, docs: Vec<Value>) -> String {
    json!({
        "responseHeader": {"status": 0, "QTime": 1, "params": params},
        "response": {"numFound": num_found, "start": 0, "docs": docs},
    })
    .to_string()
}

/// Body of the page of `rows` records starting at `start` in a corpus of `total`.
pub(crate) fn page_body(total: usize, start: usize, rows: usize) -> String {
    let docs = (start..total.min(start + rows)).map(mock_doc).collect();
    envelope(json!({"start": start, "rows": rows}), total, docs)
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct MockState {
    total: usize,
    failure: Option<(u16, String)>,
    raw_body: Option<String>,
    requests: Vec<RecordedRequest>,
    connects: Vec<HeaderMap>,
}

/// Serves a synthetic corpus of `total` documents.
///
/// `id:<n>` queries return document `n` restricted to `fl`;
/// `citations(...)`/`references(...)` return two children derived from
/// the parent bibcode; anything else pages through the corpus.
#[derive(Clone, Default)]
pub(crate) struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn with_docs(total: usize) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().total = total;
        api
    }

    /// Every request answers with `status` and `body`.
    pub fn failing(status: u16, body: &str) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().failure = Some((status, body.to_string()));
        api
    }

    /// Every request answers 200 with `body`.
    pub fn raw(body: &str) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().raw_body = Some(body.to_string());
        api
    }

    /// A client with a fixed token and this API as its connector.
    pub fn client(&self) -> AdsClient {
        AdsClient::new(Config::default())
            .with_connector(Arc::new(self.clone()))
            .with_credentials(Arc::new(
                StaticCredentials::default().var("ADS_API_TOKEN", "mock-token"),
            ))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn connects(&self) -> Vec<HeaderMap> {
        self.state.lock().unwrap().connects.clone()
    }
}

impl Connector for MockApi {
    fn connect(&self, headers: HeaderMap) -> Result<Box<dyn Transport>> {
        self.state.lock().unwrap().connects.push(headers);
        Ok(Box::new(self.clone()))
    }
}

impl Transport for MockApi {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let request = RecordedRequest {
            method: "GET",
            url: url.to_string(),
            params,
            body: None,
        };
        let body = search_body(&state, &request);
        state.requests.push(request);
        Ok(respond(&state, body))
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            params: Vec::new(),
            body: Some(body.clone()),
        });
        let metrics = json!({
            "basic stats": {"number of papers": body["bibcodes"].as_array().map_or(0, Vec::len)},
            "indicators": {"h": 1},
        });
        Ok(respond(&state, metrics.to_string()))
    }
}

fn respond(state: &MockState, body: String) -> HttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert("X-RateLimit-Limit", HeaderValue::from_static("5000"));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("4999"));
    headers.insert("X-RateLimit-Reset", HeaderValue::from_static("1436313600"));
    match (&state.failure, &state.raw_body) {
        (Some((status, text)), _) => HttpResponse {
            status: *status,
            body: text.clone(),
            headers,
        },
        (None, Some(raw)) => HttpResponse {
            status: 200,
            body: raw.clone(),
            headers,
        },
        (None, None) => HttpResponse {
            status: 200,
            body,
            headers,
        },
    }
}

fn restrict(doc: Value, fields: &[&str]) -> Value {
    match doc {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| fields.contains(&k.as_str()))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

fn search_body(state: &MockState, request: &RecordedRequest) -> String {
    let q = request.param("q").unwrap_or_default();
    let fl: Vec<&str> = request
        .param("fl")
        .map(|f| f.split(',').collect())
        .unwrap_or_default();
    let start: usize = request
        .param("start")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let rows: usize = request
        .param("rows")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let params = json!({"q": q, "start": start.to_string(), "rows": rows.to_string()});

    if let Some(id) = q.strip_prefix("id:") {
        let docs: Vec<Value> = id
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=state.total).contains(n))
            .map(|n| restrict(mock_doc(n - 1), &fl))
            .into_iter()
            .collect();
        let found = docs.len();
        return envelope(params, found, docs);
    }

    for prefix in ["citations(bibcode:", "references(bibcode:"] {
        if let Some(rest) = q.strip_prefix(prefix) {
            let parent = rest.trim_end_matches(')');
            let docs = (1..=2)
                .map(|n| {
                    json!({
                        "id": format!("{}/{}", parent, n),
                        "bibcode": format!("{}/{}", parent, n),
                        "first_author": "Child, C.",
                        "year": "2001",
                    })
                })
                .collect();
            return envelope(params, 2, docs);
        }
    }

    let docs = (start..state.total.min(start + rows))
        .map(|i| restrict(mock_doc(i), &fl))
        .collect();
    envelope(params, state.total, docs)
}
