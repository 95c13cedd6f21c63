//! JSON:API document envelope
//!
//! Only the parts of the format the client relies on are modelled: primary
//! `data`, the `included` side-list, resource relationships and the
//! `meta.pagination.count` total.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A response document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary data; the field is required, `null` is allowed
    pub data: PrimaryData,
    /// Sibling resources referenced by relationships
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<RawResource>,
    /// Top-level metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Document {
    /// Total item count reported in `meta.pagination.count`
    pub fn total_count(&self) -> Option<usize> {
        self.meta
            .as_ref()
            .and_then(|m| m.pagination.as_ref())
            .map(|p| p.count)
    }

    /// Split a list document into its items and side-list
    pub fn into_list(self) -> Result<(Vec<RawResource>, Vec<RawResource>)> {
        match self.data {
            PrimaryData::Many(items) => Ok((items, self.included)),
            PrimaryData::One(_) => Err(Error::malformed(
                "expected an array of resources in `data`, got a single object",
            )),
            PrimaryData::Null => Err(Error::malformed(
                "expected an array of resources in `data`, got null",
            )),
        }
    }

    /// Split a single-resource document into its item and side-list
    pub fn into_single(self) -> Result<(RawResource, Vec<RawResource>)> {
        match self.data {
            PrimaryData::One(item) => Ok((*item, self.included)),
            PrimaryData::Many(_) => Err(Error::malformed(
                "expected a single resource in `data`, got an array",
            )),
            PrimaryData::Null => Err(Error::malformed("expected a resource in `data`, got null")),
        }
    }
}

/// Primary data of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<RawResource>),
    One(Box<RawResource>),
    Null,
}

/// Top-level `meta` object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

/// `meta.pagination`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Total items matching the current filter and sort
    pub count: usize,
}

/// A resource object as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<JsonValue>,
}

impl RawResource {
    /// Identifier of this resource
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            kind: self.kind.clone(),
            id: self.id.clone(),
        }
    }
}

/// `{ "type": ..., "id": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// A relationship object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// `None` when the server omitted `data`; `Some(Linkage::Empty)` when it
    /// sent `null`
    #[serde(
        default,
        deserialize_with = "present_linkage",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Linkage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
}

/// Resource linkage of a relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceIdentifier>),
    One(ResourceIdentifier),
    Empty,
}

impl Linkage {
    /// Whether the server declared the relationship empty
    pub fn is_empty(&self) -> bool {
        match self {
            Linkage::Many(ids) => ids.is_empty(),
            Linkage::One(_) => false,
            Linkage::Empty => true,
        }
    }
}

fn present_linkage<'de, D>(deserializer: D) -> std::result::Result<Option<Linkage>, D::Error>
where
    D: Deserializer<'de>,
{
    Linkage::deserialize(deserializer).map(Some)
}

/// Relationship `links`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// Included resources of one response, keyed by (type, id).
///
/// Shared by every item hydrated from the same response.
#[derive(Debug, Clone, Default)]
pub struct SideTable {
    entries: Arc<HashMap<ResourceIdentifier, RawResource>>,
}

impl SideTable {
    /// Index a side-list
    pub fn new(included: Vec<RawResource>) -> Self {
        let entries = included
            .into_iter()
            .map(|item| (item.identifier(), item))
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Look up an included resource
    pub fn get(&self, identifier: &ResourceIdentifier) -> Option<&RawResource> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_list_document() {
        let doc: Document = serde_json::from_value(json!({
            "data": [
                {"type": "image", "id": "a", "attributes": {"title": "A"}},
                {"type": "image", "id": "b"}
            ],
            "meta": {"pagination": {"count": 120}}
        }))
        .unwrap();

        assert_eq!(doc.total_count(), Some(120));
        let (items, included) = doc.into_list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].attributes.as_ref().unwrap()["title"], "A");
        assert!(included.is_empty());
    }

    #[test]
    fn test_missing_data_is_rejected() {
        let result = serde_json::from_value::<Document>(json!({
            "meta": {"pagination": {"count": 1}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_null_and_single_data() {
        let doc: Document = serde_json::from_value(json!({"data": null})).unwrap();
        assert_eq!(doc.data, PrimaryData::Null);
        assert!(doc.clone().into_list().is_err());
        assert_eq!(doc.total_count(), None);

        let doc: Document =
            serde_json::from_value(json!({"data": {"type": "user", "id": "u1"}})).unwrap();
        let (item, _) = doc.into_single().unwrap();
        assert_eq!(item.kind, "user");
    }

    #[test]
    fn test_relationship_linkage_states() {
        let raw: RawResource = serde_json::from_value(json!({
            "type": "image",
            "id": "a",
            "relationships": {
                "uploader": {"data": {"type": "user", "id": "u1"}},
                "characters": {"data": []},
                "artist": {"data": null},
                "source-result": {"links": {"related": "https://x/images/a/source-result"}}
            }
        }))
        .unwrap();

        let rel = &raw.relationships;
        assert!(matches!(rel["uploader"].data, Some(Linkage::One(_))));
        assert!(rel["characters"].data.as_ref().unwrap().is_empty());
        assert_eq!(rel["artist"].data, Some(Linkage::Empty));
        assert_eq!(rel["source-result"].data, None);
        assert_eq!(
            rel["source-result"].links.as_ref().unwrap().related.as_deref(),
            Some("https://x/images/a/source-result")
        );
    }

    #[test]
    fn test_side_table_lookup() {
        let table = SideTable::new(vec![RawResource {
            kind: "user".into(),
            id: "u1".into(),
            attributes: None,
            relationships: BTreeMap::new(),
            links: None,
        }]);

        let key = ResourceIdentifier {
            kind: "user".into(),
            id: "u1".into(),
        };
        assert_eq!(table.len(), 1);
        assert!(table.get(&key).is_some());
        assert!(table
            .get(&ResourceIdentifier {
                kind: "artist".into(),
                id: "u1".into()
            })
            .is_none());
    }
}
