//! # ads-client
//!
//! A blocking Rust client for the NASA ADS search API.
//!
//! Provides:
//! - **Paginated search**: [`SearchQuery`] fetches pages as you pull records
//!   and stops when every match is fetched or a page cap is hit
//! - **Lazy records**: fields missing from a [`Record`] are fetched on first
//!   read and cached on the record
//! - **Metrics**: [`MetricsQuery`] posts bibcodes to the metrics service
//! - **CLI**: `ads` binary behind the `cli` feature
//!
//! ## Quick Start
//!
//! ```no_run
//! # fn example() -> ads_client::error::Result<()> {
//! use ads_client::{AdsClient, Advance, StopReason};
//!
//! // Token from ADS_API_TOKEN, ADS_DEV_KEY, ~/.ads/token or ~/.ads/dev_key
//! let client = AdsClient::default();
//!
//! let mut query = client
//!     .search("star")
//!     .term("aff", "Mount Stromlo")
//!     .rows(25)
//!     .max_pages(2)
//!     .build()?;
//!
//! loop {
//!     match query.next_record()? {
//!         Advance::Record(mut paper) => {
//!             // `title` was not requested, so this read costs one request.
//!             let title = paper.title()?;
//!             println!("{} {:?}", paper, title);
//!         }
//!         Advance::Stop(StopReason::MaxPages) => {
//!             println!("stopped at {}", query.progress());
//!             break;
//!         }
//!         Advance::Stop(StopReason::AllFound) => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod metrics;
pub mod network;
pub mod parse;
pub mod query;
pub mod rate_limit;
pub mod record;
pub mod search;
pub mod transport;
pub mod types;

mod session;

#[cfg(test)]
mod mock;

// Re-export key types at the crate root.
pub use client::AdsClient;
pub use config::Config;
pub use error::AdsError;
pub use metrics::MetricsQuery;
pub use query::QueryBuilder;
pub use record::Record;
pub use search::{QueryParams, SearchQuery, SearchQueryBuilder};
pub use types::*;
