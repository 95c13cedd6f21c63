//! Common types used throughout jsonapi-pager
//!
//! This module contains shared type definitions, type aliases,
//! and the small enumerations exposed by the remote service.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Resource Kind
// ============================================================================

/// The `type` tag carried by every JSON:API resource object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    User,
    Artist,
    Character,
    /// Any type tag this crate has no dedicated accessors for
    Other(String),
}

impl ResourceKind {
    /// Parse a wire type tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "image" => Self::Image,
            "user" => Self::User,
            "artist" => Self::Artist,
            "character" => Self::Character,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire type tag
    pub fn tag(&self) -> &str {
        match self {
            Self::Image => "image",
            Self::User => "user",
            Self::Artist => "artist",
            Self::Character => "character",
            Self::Other(tag) => tag,
        }
    }

    /// Collection path segment (`images`, `users`, ...)
    pub fn collection_path(&self) -> String {
        match self {
            Self::Other(tag) => tag.clone(),
            known => format!("{}s", known.tag()),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// Verification Status
// ============================================================================

/// Moderation state of an uploaded image.
///
/// Public listings only ever show `Verified` images; the other states are
/// visible to the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Not seen by a moderator yet
    NotReviewed,
    /// Seen, decision pending
    OnReview,
    /// Accepted and publicly visible
    Verified,
    /// Rejected
    Declined,
}

// ============================================================================
// Age Rating
// ============================================================================

/// Content rating of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeRating {
    #[serde(rename = "sfw")]
    SafeForWork,
    Questionable,
    Suggestive,
    Borderline,
    Explicit,
}

impl AgeRating {
    /// The value used in filters and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SafeForWork => "sfw",
            Self::Questionable => "questionable",
            Self::Suggestive => "suggestive",
            Self::Borderline => "borderline",
            Self::Explicit => "explicit",
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_tags() {
        assert_eq!(ResourceKind::from_tag("image"), ResourceKind::Image);
        assert_eq!(ResourceKind::from_tag("user").tag(), "user");
        assert_eq!(
            ResourceKind::from_tag("tag"),
            ResourceKind::Other("tag".to_string())
        );
        assert_eq!(ResourceKind::Image.collection_path(), "images");
        assert_eq!(ResourceKind::Other("tags".into()).collection_path(), "tags");
    }

    #[test]
    fn test_verification_status_serde() {
        let status: VerificationStatus = serde_json::from_str("\"on_review\"").unwrap();
        assert_eq!(status, VerificationStatus::OnReview);

        let json = serde_json::to_string(&VerificationStatus::NotReviewed).unwrap();
        assert_eq!(json, "\"not_reviewed\"");
    }

    #[test]
    fn test_age_rating_serde() {
        let rating: AgeRating = serde_json::from_str("\"sfw\"").unwrap();
        assert_eq!(rating, AgeRating::SafeForWork);
        assert_eq!(rating.as_str(), "sfw");

        let rating: AgeRating = serde_json::from_str("\"borderline\"").unwrap();
        assert_eq!(rating, AgeRating::Borderline);
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
    }
}
