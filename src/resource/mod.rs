//! Resource module
//!
//! Hydration of raw list items, the lazily loaded `Resource` object, typed
//! image attributes and relationship resolution.

mod hydrate;
mod image;
mod model;

pub use hydrate::{Hydrator, RawHydrator, ResourceHydrator};
pub use image::{Colors, Dimensions, ImageAttributes, Source, Timestamps};
pub use model::{Related, Resource, ResourceLoader, ResourceState};
