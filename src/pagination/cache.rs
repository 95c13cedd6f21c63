//! Sparse index cache
//!
//! Hydrated items keyed by absolute position. Absence of a key means "not
//! fetched yet", never "does not exist". Entries are only ever added, and the
//! total count is kept from the first response that reports one.

use super::window::Occupancy;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Items fetched for one window, not yet visible in the cache
#[derive(Debug, Clone)]
pub struct FetchedPage<T> {
    /// First index of `items`
    pub offset: usize,
    pub items: Vec<T>,
    /// `meta.pagination.count` of the response, if present
    pub total: Option<usize>,
}

/// Position-keyed store with a sticky total count
#[derive(Debug, Clone)]
pub struct SparseCache<T> {
    items: BTreeMap<usize, T>,
    total: Option<usize>,
}

impl<T> Default for SparseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseCache<T> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            total: None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.items.contains_key(&index)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cached indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.keys().copied()
    }

    /// Total count, once any response has reported it
    pub fn total_count(&self) -> Option<usize> {
        self.total
    }

    /// Record a reported total. The first value wins.
    pub fn record_total(&mut self, total: usize) -> bool {
        if self.total.is_none() {
            self.total = Some(total);
            true
        } else {
            false
        }
    }

    /// Store items at `offset..`, leaving existing entries untouched.
    /// Returns how many new entries were added.
    pub fn insert_run(&mut self, offset: usize, items: Vec<T>) -> usize {
        let mut added = 0;
        for (position, item) in items.into_iter().enumerate() {
            if let Entry::Vacant(slot) = self.items.entry(offset + position) {
                slot.insert(item);
                added += 1;
            }
        }
        added
    }

    /// Make a fetched page visible
    pub fn commit(&mut self, page: FetchedPage<T>) -> usize {
        if let Some(total) = page.total {
            self.record_total(total);
        }
        self.insert_run(page.offset, page.items)
    }

    /// Smallest index not cached
    pub fn first_missing(&self) -> usize {
        let mut expected = 0;
        for index in self.items.keys() {
            if *index != expected {
                break;
            }
            expected += 1;
        }
        expected
    }

    /// One past the highest cached index (0 when empty)
    pub fn upper_bound(&self) -> usize {
        self.items
            .keys()
            .next_back()
            .map_or(0, |last| last + 1)
    }
}

impl<T> Occupancy for SparseCache<T> {
    fn is_cached(&self, index: usize) -> bool {
        self.contains(index)
    }

    fn predecessor(&self, index: usize) -> Option<usize> {
        self.items.predecessor(index)
    }

    fn successor(&self, index: usize) -> Option<usize> {
        self.items.successor(index)
    }
}
