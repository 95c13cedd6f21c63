//! Typed attributes of `image` resources

use crate::types::{AgeRating, VerificationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attributes of an image resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttributes {
    #[serde(default)]
    pub title: Option<String>,
    /// URL of the image file
    #[serde(rename = "file", default)]
    pub url: Option<String>,
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub dimens: Dimensions,
    #[serde(default)]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default)]
    pub timestamps: Option<Timestamps>,
    /// Original artwork rather than fan art
    #[serde(default)]
    pub is_original: bool,
    #[serde(default)]
    pub age_rating: Option<AgeRating>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colors {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub dominant: Option<String>,
}

/// Where the image was found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

impl Dimensions {
    /// Width divided by height
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if h > 0 => Some(f64::from(w) / f64::from(h)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
