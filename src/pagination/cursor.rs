//! Sequential cursor over a collection

use super::collection::PaginatedCollection;
use super::fetch::Fetcher;
use crate::error::Result;
use crate::resource::Hydrator;
use futures::stream::{self, Stream};

/// Forward cursor starting at index 0.
///
/// The sequence has no built-in end: callers bound it themselves, usually
/// with [`PaginatedCollection::count`]. Past the end, `next` yields
/// [`crate::Error::IndexOutOfRange`].
#[derive(Debug)]
pub struct Cursor<'a, F, H: Hydrator> {
    collection: &'a PaginatedCollection<F, H>,
    position: usize,
}

impl<'a, F: Fetcher, H: Hydrator> Cursor<'a, F, H> {
    pub(crate) fn new(collection: &'a PaginatedCollection<F, H>) -> Self {
        Self {
            collection,
            position: 0,
        }
    }

    /// Item at the current position; the cursor advances only on success
    pub async fn next(&mut self) -> Result<H::Output> {
        let item = self.collection.get(self.position).await?;
        self.position += 1;
        Ok(item)
    }

    /// Back to index 0. Cached items are kept.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Index the next call to `next` will return
    pub fn position(&self) -> usize {
        self.position
    }

    /// The remaining sequence as a stream. The stream ends after yielding
    /// its first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<H::Output>> + 'a
    where
        H::Output: 'a,
    {
        stream::unfold(Some(self), |state| async move {
            let mut cursor = state?;
            match cursor.next().await {
                Ok(item) => Some((Ok(item), Some(cursor))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}
