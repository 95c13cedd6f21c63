//! Paginated collection
//!
//! Indexed access to a remote ordered collection. Every public operation
//! takes the collection's lock for its whole check → plan → fetch → hydrate →
//! store sequence, so concurrent callers never fetch the same window twice
//! and never observe a half-committed page.

use super::cache::{FetchedPage, SparseCache};
use super::cursor::Cursor;
use super::fetch::{Fetcher, ListQuery};
use super::window::{plan_window, PageWindow, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::document::SideTable;
use crate::error::{Error, Result};
use crate::http::RateGate;
use crate::resource::Hydrator;
use std::ops::{Bound, RangeBounds};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

/// Lazily fetched, position-addressable view of a remote collection
pub struct PaginatedCollection<F, H: Hydrator> {
    fetcher: F,
    hydrator: H,
    query: ListQuery,
    gate: RateGate,
    page_size: usize,
    cache: Mutex<SparseCache<H::Output>>,
    fetches: AtomicUsize,
}

impl<F: Fetcher, H: Hydrator> PaginatedCollection<F, H> {
    /// Create a collection over `query` using the process-wide rate gate
    pub fn new(fetcher: F, hydrator: H, query: ListQuery) -> Self {
        Self {
            fetcher,
            hydrator,
            query,
            gate: RateGate::global(),
            page_size: DEFAULT_PAGE_SIZE,
            cache: Mutex::new(SparseCache::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Use a different rate gate
    #[must_use]
    pub fn with_gate(mut self, gate: RateGate) -> Self {
        self.gate = gate;
        self
    }

    /// Use a different page size (1 to 50)
    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of page requests dispatched so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Total count if a response has reported it
    pub async fn known_count(&self) -> Option<usize> {
        self.cache.lock().await.total_count()
    }

    /// Number of cached items
    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_cached(&self, index: usize) -> bool {
        self.cache.lock().await.contains(index)
    }

    /// Item at `index`.
    ///
    /// A cached item is returned without I/O. On a miss, one window around
    /// `index` is planned and fetched. Indices past a known end fail with
    /// [`Error::IndexOutOfRange`] without a request.
    pub async fn get(&self, index: usize) -> Result<H::Output> {
        let mut cache = self.cache.lock().await;

        if let Some(item) = cache.get(index) {
            trace!("Cache hit at {index}");
            return Ok(item.clone());
        }
        if let Some(total) = cache.total_count() {
            if index >= total {
                return Err(Error::IndexOutOfRange {
                    index,
                    count: total,
                });
            }
        }

        let window = self.bounded(plan_window(index, &*cache, self.page_size)?, &cache);
        debug!(
            "Cache miss at {index}, fetching window offset={} limit={}",
            window.offset, window.limit
        );

        let page = self.fetch_page(window).await?;
        cache.commit(page);

        cache.get(index).cloned().ok_or_else(|| Error::IndexOutOfRange {
            index,
            count: cache.total_count().unwrap_or_else(|| cache.upper_bound()),
        })
    }

    /// Items in `range`, in order
    pub async fn slice(&self, range: impl RangeBounds<usize>) -> Result<Vec<H::Output>> {
        self.slice_step(range, 1).await
    }

    /// Every `step`-th item in `range`, in order.
    ///
    /// Missing items are fetched in page-sized chunks starting at the range
    /// start; chunks that are already fully cached are skipped. Nothing is
    /// cached unless every chunk succeeds. The range is cut off at the total
    /// count once it is known.
    pub async fn slice_step(
        &self,
        range: impl RangeBounds<usize>,
        step: usize,
    ) -> Result<Vec<H::Output>> {
        if step == 0 {
            return Err(Error::validation("slice step must be at least 1"));
        }
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s
                .checked_add(1)
                .ok_or_else(|| Error::validation("slice start overflows"))?,
            Bound::Unbounded => 0,
        };
        let stop = match range.end_bound() {
            Bound::Included(&e) => e
                .checked_add(1)
                .ok_or_else(|| Error::validation("slice end overflows"))?,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => {
                return Err(Error::validation("slice needs an upper bound"));
            }
        };

        let mut cache = self.cache.lock().await;
        let mut stop = clamp_to_total(stop, cache.total_count());
        if start >= stop {
            return Ok(Vec::new());
        }

        let mut staged: Vec<FetchedPage<H::Output>> = Vec::new();
        let mut reported_total = cache.total_count();

        for offset in (start..stop).step_by(self.page_size) {
            if reported_total.is_some_and(|total| offset >= total) {
                break;
            }
            let window = PageWindow::new(offset, self.page_size);
            let chunk_end = window.end().min(stop);
            let needs_fetch = requested(start, step, offset, chunk_end)
                .any(|index| !cache.contains(index));
            if !needs_fetch {
                trace!("Chunk at {offset} already cached");
                continue;
            }

            debug!(
                "Slice {start}..{stop} fetching window offset={} limit={}",
                window.offset, window.limit
            );
            let page = self.fetch_page(window).await?;
            if reported_total.is_none() {
                reported_total = page.total;
            }
            staged.push(page);
        }

        for page in staged {
            cache.commit(page);
        }
        stop = clamp_to_total(stop, cache.total_count());

        (start..stop)
            .step_by(step)
            .map(|index| {
                cache.get(index).cloned().ok_or_else(|| Error::IndexOutOfRange {
                    index,
                    count: cache.total_count().unwrap_or_else(|| cache.upper_bound()),
                })
            })
            .collect()
    }

    /// Total number of items.
    ///
    /// Served from the cache once known. Otherwise exactly one page is
    /// fetched for its metadata, and its items are cached as well.
    pub async fn count(&self) -> Result<usize> {
        let mut cache = self.cache.lock().await;
        if let Some(total) = cache.total_count() {
            return Ok(total);
        }

        let window = if cache.contains(0) {
            plan_window(cache.first_missing(), &*cache, self.page_size)?
        } else {
            PageWindow::new(0, self.page_size)
        };
        debug!(
            "Counting via window offset={} limit={}",
            window.offset, window.limit
        );

        let page = self.fetch_page(window).await?;
        let total = page.total.ok_or_else(|| {
            Error::stale_metadata(format!(
                "no meta.pagination.count for {}",
                self.query.url
            ))
        })?;
        cache.commit(page);
        Ok(total)
    }

    /// Cursor over the collection starting at index 0
    pub fn iter(&self) -> Cursor<'_, F, H> {
        Cursor::new(self)
    }

    /// Shrink a planned window so it does not reach past a known end
    fn bounded(&self, window: PageWindow, cache: &SparseCache<H::Output>) -> PageWindow {
        match cache.total_count() {
            Some(total) if window.end() > total && window.offset < total => {
                PageWindow::new(window.offset, total - window.offset)
            }
            _ => window,
        }
    }

    /// Dispatch one page request and hydrate the response without touching
    /// the cache
    async fn fetch_page(&self, window: PageWindow) -> Result<FetchedPage<H::Output>> {
        self.gate.wait().await;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let request = self.query.page(window);
        let document = self.fetcher.fetch(&request).await?;
        let total = document.total_count();
        let (mut items, included) = document.into_list()?;

        if items.len() > window.limit {
            warn!(
                "Server returned {} items for a window of {}, ignoring the excess",
                items.len(),
                window.limit
            );
            items.truncate(window.limit);
        }

        let included = SideTable::new(included);
        let items = items
            .into_iter()
            .map(|item| self.hydrator.hydrate(item, &included))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Fetched {} items at offset {} (total {:?})",
            items.len(),
            window.offset,
            total
        );

        Ok(FetchedPage {
            offset: window.offset,
            items,
            total,
        })
    }
}

impl<F, H: Hydrator> std::fmt::Debug for PaginatedCollection<F, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedCollection")
            .field("query", &self.query)
            .field("page_size", &self.page_size)
            .field("gate", &self.gate)
            .field("fetches", &self.fetches.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

fn clamp_to_total(stop: usize, total: Option<usize>) -> usize {
    total.map_or(stop, |total| stop.min(total))
}

/// Requested indices (`start`, `start + step`, ...) inside `[from, to)`
fn requested(start: usize, step: usize, from: usize, to: usize) -> impl Iterator<Item = usize> {
    let skip = from.saturating_sub(start).div_ceil(step);
    (start..to).step_by(step).skip(skip)
}
