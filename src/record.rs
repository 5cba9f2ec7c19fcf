//! A single ADS search result.
//!
//! A [`Record`] holds whatever fields the search returned. Any other field is
//! fetched from the API the first time it is read, through a one-record query
//! on the record's `id`, and then cached on the record. Reading a field that
//! was not part of the original search therefore costs one HTTP request the
//! first time and nothing afterwards.

use crate::client::AdsClient;
use crate::error::{AdsError, Result};
use crate::query::QueryBuilder;
use crate::types::{Author, Relation};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Rows requested when fetching the citations or references of a record.
pub const LINKED_ROWS: u32 = 200;

static NULL: Value = Value::Null;

/// One bibliographic record.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Map<String, Value>,
    resolved: BTreeSet<String>,
    citations: Option<Vec<Record>>,
    references: Option<Vec<Record>>,
    client: Option<AdsClient>,
}

impl Record {
    /// Wrap a field map. The record cannot fetch missing fields until
    /// [`with_client`](Self::with_client) binds it to a client.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self::from_doc(fields, None)
    }

    pub(crate) fn from_doc(fields: Map<String, Value>, client: Option<AdsClient>) -> Self {
        if !fields.contains_key("id") {
            tracing::warn!("No article id found -- on-demand attribute lookup will fail");
        }
        Self {
            fields,
            resolved: BTreeSet::new(),
            citations: None,
            references: None,
            client,
        }
    }

    pub fn with_client(mut self, client: AdsClient) -> Self {
        self.client = Some(client);
        self
    }

    /// A field if it is already present. Never touches the network.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Names of the fields fetched on demand so far.
    pub fn resolved_fields(&self) -> impl Iterator<Item = &str> {
        self.resolved.iter().map(String::as_str)
    }

    /// The record `id`, rendered as a string. `None` when absent or null.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn bibcode(&self) -> Option<&str> {
        self.fields.get("bibcode").and_then(Value::as_str)
    }

    /// Read a field, fetching it from the API if the record does not have it.
    pub fn field(&mut self, name: &str) -> Result<&Value> {
        if !self.fields.contains_key(name) {
            self.get_field(name)?;
        }
        Ok(self.fields.get(name).unwrap_or(&NULL))
    }

    /// Read a field as `T`, fetching it first if needed.
    pub fn field_as<T: DeserializeOwned>(&mut self, name: &str) -> Result<T> {
        let value = self.field(name)?.clone();
        serde_json::from_value(value)
            .map_err(|e| AdsError::Parse(format!("field {:?}: {}", name, e)))
    }

    /// Query the API for a single field of this record by `id` and cache it.
    ///
    /// A field the API does not return is cached as `null`, so it is not
    /// requested again.
    pub fn get_field(&mut self, name: &str) -> Result<Value> {
        let id = self.id().ok_or(AdsError::MissingId)?;
        let client = self.client.clone().ok_or(AdsError::Detached)?;

        tracing::debug!(%id, field = name, "fetching missing field");
        let mut query = client
            .search(QueryBuilder::new().id(&id).build())
            .fields([name])
            .rows(1)
            .max_pages(1)
            .build()?;
        let found = query
            .next_record()?
            .into_record()
            .ok_or_else(|| AdsError::NotFound(format!("no record with id {}", id)))?;

        let value = found.get(name).cloned().unwrap_or(Value::Null);
        self.fields.insert(name.to_string(), value.clone());
        self.resolved.insert(name.to_string());
        Ok(value)
    }

    pub fn title(&mut self) -> Result<Option<Vec<String>>> {
        self.field_as("title")
    }

    pub fn abstract_text(&mut self) -> Result<Option<String>> {
        self.field_as("abstract")
    }

    pub fn author(&mut self) -> Result<Option<Vec<String>>> {
        self.field_as("author")
    }

    /// Authors parsed from the `author` field.
    pub fn authors(&mut self) -> Result<Vec<Author>> {
        Ok(self
            .author()?
            .unwrap_or_default()
            .iter()
            .map(|name| Author::from_ads_format(name))
            .collect())
    }

    pub fn aff(&mut self) -> Result<Option<Vec<String>>> {
        self.field_as("aff")
    }

    pub fn citation_count(&mut self) -> Result<Option<u64>> {
        self.field_as("citation_count")
    }

    pub fn read_count(&mut self) -> Result<Option<u64>> {
        self.field_as("read_count")
    }

    pub fn bibstem(&mut self) -> Result<Option<Vec<String>>> {
        self.field_as("bibstem")
    }

    pub fn identifier(&mut self) -> Result<Option<Vec<String>>> {
        self.field_as("identifier")
    }

    pub fn keyword(&mut self) -> Result<Option<Vec<String>>> {
        self.field_as("keyword")
    }

    pub fn page(&mut self) -> Result<Option<Vec<String>>> {
        self.field_as("page")
    }

    pub fn volume(&mut self) -> Result<Option<String>> {
        self.field_as("volume")
    }

    pub fn issue(&mut self) -> Result<Option<String>> {
        self.field_as("issue")
    }

    /// Publication name (the `pub` field).
    pub fn pub_name(&mut self) -> Result<Option<String>> {
        self.field_as("pub")
    }

    pub fn pubdate(&mut self) -> Result<Option<String>> {
        self.field_as("pubdate")
    }

    /// Publication year. ADS sends it as a string; integers are accepted too.
    pub fn year(&mut self) -> Result<Option<u16>> {
        match self.field("year")? {
            Value::Null => Ok(None),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| AdsError::Parse(format!("year {:?} is not a number", s))),
            Value::Number(n) => n
                .as_u64()
                .and_then(|y| u16::try_from(y).ok())
                .map(Some)
                .ok_or_else(|| AdsError::Parse(format!("year {} is out of range", n))),
            other => Err(AdsError::Parse(format!("unexpected year value {}", other))),
        }
    }

    /// Compare by bibcode.
    ///
    /// Fails with [`AdsError::Incomparable`] when either record has no bibcode.
    pub fn try_eq(&self, other: &Record) -> Result<bool> {
        match (self.fields.get("bibcode"), other.fields.get("bibcode")) {
            (Some(a), Some(b)) if !a.is_null() && !b.is_null() => Ok(a == b),
            _ => Err(AdsError::Incomparable),
        }
    }

    /// Records citing this one, fetched once.
    pub fn citations(&mut self) -> Result<&[Record]> {
        self.linked_mut(Relation::Citations).map(|v| v.as_slice())
    }

    /// Records referenced by this one, fetched once.
    pub fn references(&mut self) -> Result<&[Record]> {
        self.linked_mut(Relation::References).map(|v| v.as_slice())
    }

    /// Linked records already fetched for `relation`. Never touches the network.
    pub fn linked(&self, relation: Relation) -> Option<&[Record]> {
        match relation {
            Relation::Citations => self.citations.as_deref(),
            Relation::References => self.references.as_deref(),
        }
    }

    /// Fetch citations `depth` levels deep. Returns the number of records in
    /// the tree, this one included.
    pub fn build_citation_tree(&mut self, depth: u32) -> Result<usize> {
        self.build_tree(Relation::Citations, depth)
    }

    /// Fetch references `depth` levels deep. Returns the number of records in
    /// the tree, this one included.
    pub fn build_reference_tree(&mut self, depth: u32) -> Result<usize> {
        self.build_tree(Relation::References, depth)
    }

    fn build_tree(&mut self, relation: Relation, depth: u32) -> Result<usize> {
        if depth < 1 {
            return Err(AdsError::InvalidDepth(depth));
        }
        let mut total = 1;
        expand_level(std::slice::from_mut(self), relation, depth, &mut total)?;
        Ok(total)
    }

    fn slot(&mut self, relation: Relation) -> &mut Option<Vec<Record>> {
        match relation {
            Relation::Citations => &mut self.citations,
            Relation::References => &mut self.references,
        }
    }

    fn linked_mut(&mut self, relation: Relation) -> Result<&mut Vec<Record>> {
        if self.slot(relation).is_none() {
            let fetched = self.fetch_linked(relation)?;
            *self.slot(relation) = Some(fetched);
        }
        Ok(self.slot(relation).get_or_insert_with(Vec::new))
    }

    fn fetch_linked(&mut self, relation: Relation) -> Result<Vec<Record>> {
        let bibcode: String = self
            .field_as::<Option<String>>("bibcode")?
            .ok_or_else(|| AdsError::NotFound("record has no bibcode".to_string()))?;
        let client = self.client.clone().ok_or(AdsError::Detached)?;
        client
            .search(relation.query(&bibcode))
            .rows(LINKED_ROWS)
            .max_pages(1)
            .build()?
            .collect()
    }
}

fn expand_level(
    level: &mut [Record],
    relation: Relation,
    depth: u32,
    total: &mut usize,
) -> Result<()> {
    if depth == 0 {
        return Ok(());
    }
    for record in level {
        let children = record.linked_mut(relation)?;
        *total += children.len();
        expand_level(children, relation, depth - 1, total)?;
    }
    Ok(())
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "None".to_string(),
        Some(other) => other.to_string(),
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut author = self
            .get("first_author")
            .and_then(Value::as_str)
            .unwrap_or("Unknown author")
            .to_string();
        if self
            .get("author")
            .and_then(Value::as_array)
            .is_some_and(|a| a.len() > 1)
        {
            author.push_str(" et al.");
        }
        write!(
            f,
            "<{} {}, {}>",
            author,
            display_value(self.get("year")),
            display_value(self.get("bibcode"))
        )
    }
}
