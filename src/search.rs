//! Paginated search.
//!
//! A [`SearchQuery`] fetches pages lazily: the first pull executes the query,
//! later pulls read from the records already fetched and only request the
//! next page once those run out. Iteration stops when every match has been
//! fetched ([`StopReason::AllFound`]) or when `max_pages` is reached
//! ([`StopReason::MaxPages`]). The second stop is resumable: raise
//! `max_pages` and keep pulling.

use crate::client::AdsClient;
use crate::error::{AdsError, Result};
use crate::parse::{ApiResponse, SolrResponse};
use crate::rate_limit::RateLimits;
use crate::record::Record;
use crate::session::Session;
use crate::types::{Advance, StopReason};
use serde::{Deserialize, Serialize};

/// Fields requested when none are given.
pub const DEFAULT_FIELDS: &[&str] = &["author", "first_author", "bibcode", "id", "year"];

pub const DEFAULT_ROWS: u32 = 50;

pub const DEFAULT_MAX_PAGES: u32 = 3;

/// Solr parameters of the *next* request a query will send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Main query expression.
    pub q: String,
    /// Filter query.
    pub fq: Option<String>,
    /// Fields to return.
    pub fl: Vec<String>,
    pub sort: Option<String>,
    /// Offset of the next page.
    pub start: u64,
    /// Page size.
    pub rows: u32,
}

impl QueryParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            fq: None,
            fl: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            sort: None,
            start: 0,
            rows: DEFAULT_ROWS,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(AdsError::InvalidQuery("rows must be greater than 0".into()));
        }
        if self.q.trim().is_empty() {
            return Err(AdsError::InvalidQuery("q must not be empty".into()));
        }
        Ok(())
    }

    /// Request parameters, omitting unset optional ones.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.q.clone())];
        if let Some(fq) = &self.fq {
            pairs.push(("fq", fq.clone()));
        }
        if !self.fl.is_empty() {
            pairs.push(("fl", self.fl.join(",")));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs.push(("start", self.start.to_string()));
        pairs.push(("rows", self.rows.to_string()));
        pairs
    }
}

/// Builder for [`SearchQuery`]. Obtain one from [`AdsClient::search`].
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    client: AdsClient,
    params: QueryParams,
    terms: Vec<(String, String)>,
    max_pages: u32,
}

impl SearchQueryBuilder {
    pub fn new(client: AdsClient) -> Self {
        Self {
            client,
            params: QueryParams::new(""),
            terms: Vec::new(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.params.q = q.into();
        self
    }

    /// Append `key:"value"` to the query expression.
    pub fn term(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.push((key.into(), value.into()));
        self
    }

    pub fn fq(mut self, fq: impl Into<String>) -> Self {
        self.params.fq = Some(fq.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.fl = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sort order, e.g. a [`Sort`](crate::types::Sort) or `"citation_count desc"`.
    pub fn sort(mut self, sort: impl ToString) -> Self {
        self.params.sort = Some(sort.to_string());
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.params.start = start;
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.params.rows = rows;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Validate the parameters and build the query. Nothing is sent yet.
    pub fn build(self) -> Result<SearchQuery> {
        let mut params = self.params;
        if !self.terms.is_empty() {
            let terms: Vec<String> = self
                .terms
                .iter()
                .map(|(k, v)| format!("{}:\"{}\"", k, v))
                .collect();
            let terms = terms.join(" ");
            params.q = match params.q.trim() {
                "" => terms,
                q => format!("{} {}", q, terms),
            };
        }
        SearchQuery::from_params(self.client, params, self.max_pages)
    }
}

/// A search that fetches its result pages on demand.
pub struct SearchQuery {
    session: Session,
    params: QueryParams,
    max_pages: u32,
    articles: Vec<Record>,
    response: Option<SolrResponse>,
    cursor: usize,
    stop: Option<StopReason>,
    short_page: bool,
    fused: bool,
}

impl SearchQuery {
    /// Build a query from a raw parameter set.
    pub fn from_params(client: AdsClient, params: QueryParams, max_pages: u32) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            session: Session::new(client),
            params,
            max_pages,
            articles: Vec::new(),
            response: None,
            cursor: 0,
            stop: None,
            short_page: false,
            fused: false,
        })
    }

    /// Parameters of the next request. Fixed at construction except for `start`.
    pub fn query(&self) -> &QueryParams {
        &self.params
    }

    /// Every record fetched so far, in order.
    pub fn articles(&self) -> &[Record] {
        &self.articles
    }

    /// Most recent page, `None` before the first request.
    pub fn response(&self) -> Option<&SolrResponse> {
        self.response.as_ref()
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Change the page cap. Raising it resumes a query stopped by
    /// [`StopReason::MaxPages`].
    pub fn set_max_pages(&mut self, max_pages: u32) {
        self.max_pages = max_pages;
    }

    /// Why the last pull returned no record, if it did.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// API token used by this query, looked up on first use.
    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    /// Rate-limit headers from the most recent page.
    pub fn ratelimits(&self) -> Option<RateLimits> {
        self.response.as_ref().and_then(ApiResponse::ratelimits)
    }

    /// `"fetched/numFound"`, or a note that nothing has been sent yet.
    pub fn progress(&self) -> String {
        match &self.response {
            None => "Query has not been executed".to_string(),
            Some(response) => format!("{}/{}", self.articles.len(), response.num_found()),
        }
    }

    /// Fetch the page at the current `start` and append its records.
    pub fn execute(&mut self) -> Result<&SolrResponse> {
        let pairs = self.params.to_pairs();
        let search_url = self.session.client().config.search_url.clone();
        let http = self.session.transport()?.get(&search_url, &pairs)?;

        let mut response = SolrResponse::load_http_response(http)?;
        response.set_client(self.session.client().clone());
        let before = self.articles.len();
        self.articles.extend(response.articles().iter().cloned());
        self.params.start += u64::from(self.params.rows);

        if self.articles.len() == before && (before as u64) < response.num_found() {
            tracing::warn!(
                fetched = before,
                num_found = response.num_found(),
                "page came back empty before numFound was reached"
            );
            self.short_page = true;
        }

        tracing::debug!(
            q = %self.params.q,
            fetched = self.articles.len(),
            num_found = response.num_found(),
            "fetched page"
        );
        Ok(self.response.insert(response))
    }

    /// Pull the next record, fetching another page if needed.
    pub fn next_record(&mut self) -> Result<Advance> {
        if self.response.is_none() {
            self.execute()?;
        }

        loop {
            if let Some(record) = self.articles.get(self.cursor) {
                let record = record.clone();
                self.cursor += 1;
                self.stop = None;
                return Ok(Advance::Record(record));
            }

            if self.short_page {
                return Err(AdsError::ShortPage {
                    fetched: self.articles.len() as u64,
                    num_found: self.response.as_ref().map_or(0, SolrResponse::num_found),
                });
            }

            if let Some(reason) = self.exhausted() {
                self.stop = Some(reason);
                return Ok(Advance::Stop(reason));
            }

            self.execute()?;
        }
    }

    /// Stop condition once the fetched records are used up.
    fn exhausted(&self) -> Option<StopReason> {
        let fetched = self.articles.len() as u64;
        let num_found = self.response.as_ref().map_or(0, SolrResponse::num_found);
        if fetched >= num_found {
            return Some(StopReason::AllFound);
        }

        let page = fetched.div_ceil(u64::from(self.params.rows));
        if page + 1 > u64::from(self.max_pages) {
            return Some(StopReason::MaxPages);
        }
        None
    }
}

impl Iterator for SearchQuery {
    type Item = Result<Record>;

    /// Ends after the first [`AdsError::ShortPage`]; other errors may be retried.
    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        match self.next_record() {
            Ok(Advance::Record(record)) => Some(Ok(record)),
            Ok(Advance::Stop(_)) => None,
            Err(e) => {
                self.fused = matches!(e, AdsError::ShortPage { .. });
                Some(Err(e))
            }
        }
    }
}

impl std::fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchQuery")
            .field("params", &self.params)
            .field("max_pages", &self.max_pages)
            .field("fetched", &self.articles.len())
            .field("cursor", &self.cursor)
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}
