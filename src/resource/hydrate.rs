//! Hydration: raw wire items to domain objects

use super::model::Resource;
use crate::document::{RawResource, SideTable};
use crate::error::{Error, Result};

/// Turns raw resource objects into the values a collection caches
pub trait Hydrator: Send + Sync {
    type Output: Clone + Send + Sync;

    /// Hydrate one item. `included` holds the sibling resources of the
    /// response the item arrived in.
    fn hydrate(&self, item: RawResource, included: &SideTable) -> Result<Self::Output>;
}

/// Produces loaded [`Resource`]s that resolve relationships from the
/// response's included resources
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceHydrator;

impl Hydrator for ResourceHydrator {
    type Output = Resource;

    fn hydrate(&self, item: RawResource, included: &SideTable) -> Result<Resource> {
        if item.id.is_empty() {
            return Err(Error::malformed(format!(
                "{} resource without an id",
                item.kind
            )));
        }
        Ok(Resource::from_raw(item, included.clone()))
    }
}

/// Keeps items as they came off the wire
#[derive(Debug, Clone, Copy, Default)]
pub struct RawHydrator;

impl Hydrator for RawHydrator {
    type Output = RawResource;

    fn hydrate(&self, item: RawResource, _included: &SideTable) -> Result<RawResource> {
        Ok(item)
    }
}
