// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # jsonapi-pager
//!
//! Lazy, cached, rate-limited access to paginated JSON:API collections.
//!
//! ## Features
//!
//! - **Indexed access**: `get`, `slice`, `count` and a forward cursor over a
//!   remote collection, fetched in `page[offset]`/`page[limit]` windows
//! - **Sparse cache**: every item is fetched at most once per collection
//! - **Window planning**: a miss fetches a full page around the index without
//!   refetching cached neighbours
//! - **Shared rate gate**: all requests in the process are spaced 500ms apart
//! - **Resources**: lazy loading and relationship resolution from `included`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jsonapi_pager::{ApiClient, ClientConfig, ResourceKind, SearchQuery, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ApiClient::new(&ClientConfig::default())?;
//!
//!     let images = client.search(
//!         &ResourceKind::Image,
//!         SearchQuery::new().filter("age_rating__iexact", "sfw"),
//!     )?;
//!
//!     println!("{} images", images.count().await?);
//!     for image in images.slice(0..10).await? {
//!         println!("{}", image.image()?.title.unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     PaginatedCollection                         │
//! │     get(i)     slice(range, step)     count()     iter()        │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┼───────────────┬─────────────────┐
//! │ SparseCache  │ plan_window   │   RateGate    │ Fetcher/Hydrator│
//! ├──────────────┼───────────────┼───────────────┼─────────────────┤
//! │ index → item │ gap-bounded   │ governor,     │ HttpFetcher     │
//! │ sticky total │ page windows  │ process-wide  │ ResourceHydrator│
//! └──────────────┴───────────────┴───────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Field and relationship name conversion
pub mod naming;

/// JSON:API document envelope
pub mod document;

/// HTTP client and rate gate
pub mod http;

/// Authentication implementations
pub mod auth;

/// Window planning, sparse cache and paginated collections
pub mod pagination;

/// Resource objects and hydration
pub mod resource;

/// Search query parameters
pub mod query;

/// Client configuration
pub mod config;

/// Service client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::ClientConfig;
pub use pagination::{Cursor, Fetcher, ListQuery, PaginatedCollection};
pub use query::SearchQuery;
pub use resource::{Hydrator, Related, Resource, ResourceLoader};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
