//! Small public value types.

use crate::query::QueryBuilder;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a paginated query stopped yielding records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every record reported by `numFound` has been fetched. Terminal.
    AllFound,
    /// The `max_pages` cap was reached. Raising the cap resumes iteration.
    MaxPages,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllFound => f.write_str("All records found"),
            Self::MaxPages => f.write_str("Maximum number of pages queried"),
        }
    }
}

/// Outcome of one pull from a paginated query.
#[derive(Debug, Clone)]
pub enum Advance {
    Record(Record),
    Stop(StopReason),
}

impl Advance {
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Stop(_) => None,
        }
    }
}

/// Which link between records a tree follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Citations,
    References,
}

impl Relation {
    /// ADS operator query for this relation of `bibcode`.
    pub fn query(&self, bibcode: &str) -> String {
        match self {
            Self::Citations => QueryBuilder::citations_of(bibcode).build(),
            Self::References => QueryBuilder::references_of(bibcode).build(),
        }
    }
}

/// An author parsed from an ADS name string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Raw name as returned by ADS ("Last, First M.").
    pub name: String,
    pub family_name: String,
    pub given_name: Option<String>,
}

impl Author {
    /// Parse an author name in ADS format ("Last, First M.").
    pub fn from_ads_format(name: &str) -> Self {
        if let Some((family, given)) = name.split_once(',') {
            return Author {
                name: name.to_string(),
                family_name: family.trim().to_string(),
                given_name: Some(given.trim().to_string()),
            };
        }
        let mut words: Vec<&str> = name.split_whitespace().collect();
        match words.pop() {
            Some(last) if !words.is_empty() => Author {
                name: name.to_string(),
                family_name: last.to_string(),
                given_name: Some(words.join(" ")),
            },
            _ => Author {
                name: name.to_string(),
                family_name: name.to_string(),
                given_name: None,
            },
        }
    }

    /// Format as "First M. Last" for display.
    pub fn display_name(&self) -> String {
        match &self.given_name {
            Some(given) => format!("{} {}", given, self.family_name),
            None => self.family_name.clone(),
        }
    }
}

/// Sort specification for search queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn date_desc() -> Self {
        Self::new("date", SortDirection::Desc)
    }

    pub fn citation_count_desc() -> Self {
        Self::new("citation_count", SortDirection::Desc)
    }

    /// Parse `"field"` or `"field asc|desc"`. Direction defaults to descending.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split_whitespace();
        let field = parts.next()?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("desc") => SortDirection::Desc,
            Some("asc") => SortDirection::Asc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(field, direction))
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{} {}", self.field, dir)
    }
}
