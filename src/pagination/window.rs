//! Page window planning
//!
//! Given the indices already cached and a target index that is not, decide
//! which `page[offset]`/`page[limit]` block to request. The window always
//! contains the target, never exceeds the page size, and never reaches into
//! a cached region, so one miss costs exactly one round-trip and the
//! neighbourhood of the target is fetched along with it.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

/// Largest `page[limit]` the service accepts
pub const MAX_PAGE_SIZE: usize = 50;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = MAX_PAGE_SIZE;

/// Half-open block of remote items `[offset, offset + limit)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// One past the last index of the window
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.offset && index < self.end()
    }

    pub fn indices(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Read access to the set of cached indices
pub trait Occupancy {
    fn is_cached(&self, index: usize) -> bool;

    /// Largest cached index strictly below `index`
    fn predecessor(&self, index: usize) -> Option<usize>;

    /// Smallest cached index strictly above `index`
    fn successor(&self, index: usize) -> Option<usize>;
}

impl Occupancy for BTreeSet<usize> {
    fn is_cached(&self, index: usize) -> bool {
        self.contains(&index)
    }

    fn predecessor(&self, index: usize) -> Option<usize> {
        self.range(..index).next_back().copied()
    }

    fn successor(&self, index: usize) -> Option<usize> {
        self.range(index.saturating_add(1)..).next().copied()
    }
}

impl<T> Occupancy for BTreeMap<usize, T> {
    fn is_cached(&self, index: usize) -> bool {
        self.contains_key(&index)
    }

    fn predecessor(&self, index: usize) -> Option<usize> {
        self.range(..index).next_back().map(|(k, _)| *k)
    }

    fn successor(&self, index: usize) -> Option<usize> {
        self.range(index.saturating_add(1)..).next().map(|(k, _)| *k)
    }
}

/// Plan the window to fetch for a cache miss at `target`.
///
/// The free gap around `target` runs from just after the previous cached
/// index to just before the next one. With nothing cached at all the gap
/// starts at `target` itself; with nothing cached below but something above,
/// it starts at 0. The window grows outward from `target`, alternating right
/// and left, until it holds `page_size` items or fills the gap.
///
/// Fails with [`Error::AlreadyCached`] if `target` is cached.
pub fn plan_window<O: Occupancy + ?Sized>(
    target: usize,
    cached: &O,
    page_size: usize,
) -> Result<PageWindow> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(Error::validation(format!(
            "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    if cached.is_cached(target) {
        return Err(Error::AlreadyCached { index: target });
    }

    let prev = cached.predecessor(target);
    let next = cached.successor(target);

    let floor = match (prev, next) {
        (Some(p), _) => p + 1,
        (None, Some(_)) => 0,
        (None, None) => target,
    };
    let ceiling = next.unwrap_or(usize::MAX);

    let mut start = target;
    let mut end = target
        .checked_add(1)
        .ok_or_else(|| Error::validation(format!("index {target} cannot be addressed")))?;
    let mut right_turn = true;

    while end - start < page_size {
        let can_grow_right = end < ceiling;
        let can_grow_left = start > floor;
        if !can_grow_right && !can_grow_left {
            break;
        }

        if can_grow_right && (right_turn || !can_grow_left) {
            end += 1;
        } else {
            start -= 1;
        }
        right_turn = !right_turn;
    }

    debug_assert!(!cached.is_cached(start));
    debug_assert!(!cached.is_cached(end - 1));

    Ok(PageWindow::new(start, end - start))
}
