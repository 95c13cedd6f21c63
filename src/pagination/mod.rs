//! Pagination module
//!
//! Position-addressed access to a remote, `page[offset]`/`page[limit]`
//! windowed collection.
//!
//! # Overview
//!
//! A `PaginatedCollection` keeps a `SparseCache` of hydrated items. On a cache
//! miss the window planner picks one block of up to 50 items around the
//! requested index, the shared `RateGate` spaces the request, a `Fetcher`
//! performs it and a `Hydrator` turns the raw items into cached values.

mod cache;
mod collection;
mod cursor;
mod fetch;
mod window;

pub use cache::{FetchedPage, SparseCache};
pub use collection::PaginatedCollection;
pub use cursor::Cursor;
pub use fetch::{Fetcher, HttpFetcher, ListQuery, PageRequest, LIMIT_PARAM, OFFSET_PARAM};
pub use window::{plan_window, Occupancy, PageWindow, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
