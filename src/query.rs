//! ADS query string builder.
//!
//! # Example
//!
//! ```
//! use ads_client::QueryBuilder;
//!
//! let q = QueryBuilder::new()
//!     .first_author("Casey, Andrew R.")
//!     .and()
//!     .year_range(2010, 2015)
//!     .build();
//! assert_eq!(q, "first_author:\"Casey, Andrew R.\" AND year:[2010 TO 2015]");
//! ```

/// Builder for ADS query expressions.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    parts: Vec<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quoted `key:"value"` term.
    pub fn term(mut self, key: &str, value: &str) -> Self {
        self.parts.push(format!("{}:\"{}\"", key, value));
        self
    }

    pub fn author(self, name: &str) -> Self {
        self.term("author", name)
    }

    pub fn first_author(self, name: &str) -> Self {
        self.term("first_author", name)
    }

    pub fn title(self, text: &str) -> Self {
        self.term("title", text)
    }

    /// Affiliation search term.
    pub fn aff(self, text: &str) -> Self {
        self.term("aff", text)
    }

    pub fn year(mut self, year: u16) -> Self {
        self.parts.push(format!("year:{}", year));
        self
    }

    /// Inclusive year range.
    pub fn year_range(mut self, from: u16, to: u16) -> Self {
        self.parts.push(format!("year:[{} TO {}]", from, to));
        self
    }

    /// Inclusive publication date range; either end may be open.
    pub fn pubdate_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.parts.push(format!(
            "pubdate:[{} TO {}]",
            from.unwrap_or("*"),
            to.unwrap_or("*")
        ));
        self
    }

    pub fn bibcode(mut self, bibcode: &str) -> Self {
        self.parts.push(format!("bibcode:{}", bibcode));
        self
    }

    /// Match a record by its internal ADS `id`.
    pub fn id(mut self, id: &str) -> Self {
        self.parts.push(format!("id:{}", id));
        self
    }

    pub fn property(mut self, prop: &str) -> Self {
        self.parts.push(format!("property:{}", prop));
        self
    }

    pub fn and(mut self) -> Self {
        self.parts.push("AND".to_string());
        self
    }

    pub fn or(mut self) -> Self {
        self.parts.push("OR".to_string());
        self
    }

    /// Exclude the following term.
    pub fn exclude(mut self) -> Self {
        self.parts.push("NOT".to_string());
        self
    }

    /// Add a raw fragment, unescaped.
    pub fn raw(mut self, query: &str) -> Self {
        self.parts.push(query.to_string());
        self
    }

    /// Papers citing `bibcode`.
    pub fn citations_of(bibcode: &str) -> Self {
        Self::new().raw(&format!("citations(bibcode:{})", bibcode))
    }

    /// Papers referenced by `bibcode`.
    pub fn references_of(bibcode: &str) -> Self {
        Self::new().raw(&format!("references(bibcode:{})", bibcode))
    }

    pub fn build(self) -> String {
        self.parts.join(" ")
    }
}

impl std::fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.parts.join(" "))
    }
}
