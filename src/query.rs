//! Search query parameters
//!
//! Builds the filter, sort and include parameters of a collection request.
//! Field names are given in snake_case and converted to the service's
//! camelCase; a lookup suffix follows a double underscore
//! (`age_rating__iexact` → `filter[ageRating.iexact]`). Relationship names
//! in `include` are dasherized.

use crate::naming::{to_camel_case, to_dasherized};

/// Filter, sort and include parameters for a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    params: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter on `field`, optionally with a `__lookup` suffix
    #[must_use]
    pub fn filter(mut self, field: &str, value: impl ToString) -> Self {
        self.params
            .push((format!("filter[{}]", filter_path(field)), value.to_string()));
        self
    }

    /// Sort by the given fields; a leading `-` sorts descending
    #[must_use]
    pub fn sort<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        if !fields.is_empty() {
            let joined = fields
                .iter()
                .map(|field| {
                    let field = field.as_ref();
                    match field.strip_prefix('-') {
                        Some(rest) => format!("-{}", dotted(rest)),
                        None => dotted(field),
                    }
                })
                .collect::<Vec<_>>()
                .join(",");
            self.params.push(("sort".to_string(), joined));
        }
        self
    }

    /// Include the given relationships in the response
    #[must_use]
    pub fn include<S: AsRef<str>>(mut self, relationships: &[S]) -> Self {
        if !relationships.is_empty() {
            let joined = relationships
                .iter()
                .map(|name| to_dasherized(name.as_ref()))
                .collect::<Vec<_>>()
                .join(",");
            self.params.push(("include".to_string(), joined));
        }
        self
    }

    /// Add a raw parameter as-is
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn into_params(self) -> Vec<(String, String)> {
        self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// `age_rating__iexact` → `ageRating.iexact`
fn filter_path(field: &str) -> String {
    match field.split_once("__") {
        Some((name, lookup)) => format!("{}.{}", dotted(name), to_camel_case(lookup)),
        None => dotted(field),
    }
}

/// Convert each `.`-separated segment to camelCase
fn dotted(path: &str) -> String {
    path.split('.')
        .map(to_camel_case)
        .collect::<Vec<_>>()
        .join(".")
}
