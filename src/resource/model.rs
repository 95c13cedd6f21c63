//! Resource objects and relationship resolution
//!
//! A resource is either known only by id (`Unloaded`) or carries its wire
//! object (`Loaded`). Accessors that need attributes go through
//! `ensure_loaded`, which performs the one fetch needed for the transition.

use super::image::ImageAttributes;
use crate::document::{Document, Linkage, PrimaryData, RawResource, SideTable};
use crate::error::{Error, Result};
use crate::naming::{to_dasherized, to_snake_case_from_dasherized};
use crate::types::{JsonObject, ResourceKind};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Fetches single documents for resource loads and relationship lookups.
///
/// Paths are either absolute URLs or relative to the service base URL.
/// Implementations pass every request through the shared rate gate.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    async fn load_document(&self, path: &str) -> Result<Document>;
}

/// Load state of a resource
#[derive(Debug, Clone)]
pub enum ResourceState {
    Unloaded,
    Loaded {
        raw: RawResource,
        included: SideTable,
    },
}

/// Target of a resolved relationship
#[derive(Debug, Clone)]
pub enum Related {
    None,
    One(Box<Resource>),
    Many(Vec<Resource>),
}

impl Related {
    pub fn is_none(&self) -> bool {
        matches!(self, Related::None)
    }

    /// Resolved resources as a slice-like list
    pub fn resources(&self) -> Vec<&Resource> {
        match self {
            Related::None => Vec::new(),
            Related::One(resource) => vec![resource.as_ref()],
            Related::Many(resources) => resources.iter().collect(),
        }
    }
}

/// A remote resource
#[derive(Debug, Clone)]
pub struct Resource {
    kind: ResourceKind,
    id: String,
    state: ResourceState,
    related: HashMap<String, Related>,
}

impl Resource {
    /// A resource known only by kind and id
    pub fn unloaded(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            state: ResourceState::Unloaded,
            related: HashMap::new(),
        }
    }

    /// A loaded resource; `included` resolves its relationships locally
    pub fn from_raw(raw: RawResource, included: SideTable) -> Self {
        Self {
            kind: ResourceKind::from_tag(&raw.kind),
            id: raw.id.clone(),
            state: ResourceState::Loaded { raw, included },
            related: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ResourceState::Loaded { .. })
    }

    /// The wire object, if loaded
    pub fn raw(&self) -> Option<&RawResource> {
        match &self.state {
            ResourceState::Loaded { raw, .. } => Some(raw),
            ResourceState::Unloaded => None,
        }
    }

    /// Path of this resource relative to the service base URL
    pub fn path(&self) -> String {
        format!(
            "{}/{}",
            self.kind.collection_path(),
            encode_path_segment(&self.id)
        )
    }

    /// Fetch the resource if it is not loaded yet
    pub async fn ensure_loaded<L: ResourceLoader + ?Sized>(&mut self, loader: &L) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }

        debug!("Loading {} {}", self.kind, self.id);
        let document = loader.load_document(&self.path()).await?;
        let (raw, included) = document.into_single()?;
        if raw.id != self.id {
            return Err(Error::malformed(format!(
                "requested {} '{}' but received '{}'",
                self.kind, self.id, raw.id
            )));
        }

        self.state = ResourceState::Loaded {
            raw,
            included: SideTable::new(included),
        };
        Ok(())
    }

    /// Attribute object of a loaded resource
    pub fn attributes(&self) -> Result<&JsonObject> {
        static EMPTY: once_cell::sync::Lazy<JsonObject> = once_cell::sync::Lazy::new(JsonObject::new);

        match &self.state {
            ResourceState::Loaded { raw, .. } => Ok(raw.attributes.as_ref().unwrap_or(&EMPTY)),
            ResourceState::Unloaded => Err(Error::NotLoaded {
                kind: self.kind.to_string(),
                id: self.id.clone(),
            }),
        }
    }

    /// One attribute of a loaded resource, by its wire name
    pub fn attribute<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.attributes()?.get(name) {
            Some(value) if !value.is_null() => Ok(Some(serde_json::from_value(value.clone())?)),
            _ => Ok(None),
        }
    }

    /// Typed image attributes of a loaded image
    pub fn image(&self) -> Result<ImageAttributes> {
        if self.kind != ResourceKind::Image {
            return Err(Error::WrongKind {
                id: self.id.clone(),
                expected: ResourceKind::Image.to_string(),
            });
        }
        let attributes = self.attributes()?;
        serde_json::from_value(serde_json::Value::Object(attributes.clone()))
            .map_err(|e| Error::malformed(format!("image attributes: {e}")))
    }

    /// Load if needed, then return the typed image attributes
    pub async fn load_image<L: ResourceLoader + ?Sized>(
        &mut self,
        loader: &L,
    ) -> Result<ImageAttributes> {
        self.ensure_loaded(loader).await?;
        self.image()
    }

    /// Relationship names declared by a loaded resource, in snake_case
    pub fn relationship_names(&self) -> Vec<String> {
        self.raw()
            .map(|raw| {
                raw.relationships
                    .keys()
                    .map(|name| to_snake_case_from_dasherized(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether a relationship has been resolved already
    pub fn is_relationship_loaded(&self, name: &str) -> bool {
        self.related.contains_key(&to_dasherized(name))
    }

    /// Resolve a relationship.
    ///
    /// Included resources of the response this resource came from are used
    /// when they cover every linked identifier; otherwise one request is made
    /// to the relationship's `related` link. Results are cached per name.
    pub async fn relationship<L: ResourceLoader + ?Sized>(
        &mut self,
        name: &str,
        loader: &L,
    ) -> Result<&Related> {
        let key = to_dasherized(name);
        if !self.related.contains_key(&key) {
            let related = self.resolve(&key, loader).await?;
            self.related.insert(key.clone(), related);
        }

        self.related
            .get(&key)
            .ok_or_else(|| Error::Other(format!("relationship '{key}' vanished from cache")))
    }

    async fn resolve<L: ResourceLoader + ?Sized>(&self, key: &str, loader: &L) -> Result<Related> {
        let fallback_path = format!("{}/{key}", self.path());

        let (raw, included) = match &self.state {
            ResourceState::Unloaded => return fetch_related(loader, &fallback_path).await,
            ResourceState::Loaded { raw, included } => (raw, included),
        };

        let relationship =
            raw.relationships
                .get(key)
                .ok_or_else(|| Error::UnknownRelationship {
                    kind: self.kind.to_string(),
                    name: key.to_string(),
                })?;

        match &relationship.data {
            Some(Linkage::Empty) => return Ok(Related::None),
            Some(Linkage::Many(ids)) if ids.is_empty() => return Ok(Related::Many(Vec::new())),
            Some(Linkage::One(id)) => {
                if let Some(found) = included.get(id) {
                    debug!("Resolved {key} of {} from included resources", self.id);
                    return Ok(Related::One(Box::new(Resource::from_raw(
                        found.clone(),
                        included.clone(),
                    ))));
                }
            }
            Some(Linkage::Many(ids)) => {
                let found: Option<Vec<Resource>> = ids
                    .iter()
                    .map(|id| {
                        included
                            .get(id)
                            .map(|raw| Resource::from_raw(raw.clone(), included.clone()))
                    })
                    .collect();
                if let Some(resources) = found {
                    debug!("Resolved {key} of {} from included resources", self.id);
                    return Ok(Related::Many(resources));
                }
            }
            None => {}
        }

        let path = relationship
            .links
            .as_ref()
            .and_then(|links| links.related.clone())
            .unwrap_or(fallback_path);
        fetch_related(loader, &path).await
    }
}

async fn fetch_related<L: ResourceLoader + ?Sized>(loader: &L, path: &str) -> Result<Related> {
    debug!("Fetching related resources from {path}");
    let document = loader.load_document(path).await?;
    let included = SideTable::new(document.included);

    Ok(match document.data {
        PrimaryData::Null => Related::None,
        PrimaryData::One(raw) => Related::One(Box::new(Resource::from_raw(*raw, included))),
        PrimaryData::Many(items) => Related::Many(
            items
                .into_iter()
                .map(|raw| Resource::from_raw(raw, included.clone()))
                .collect(),
        ),
    })
}

/// Percent-encode `segment` as a single URL path segment (`/` included)
fn encode_path_segment(segment: &str) -> String {
    let Ok(mut scratch) = Url::parse("http://localhost/") else {
        return segment.to_string();
    };
    if let Ok(mut segments) = scratch.path_segments_mut() {
        segments.clear().push(segment);
    }
    scratch.path().trim_start_matches('/').to_string()
}
