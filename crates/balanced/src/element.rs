#![forbid(unsafe_code)]

//! What the host materializes for a [`Balanced`](crate::Balanced) wrapper.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pass-through attributes, sorted by name.
pub type Attributes = BTreeMap<String, String>;

/// An element for the host to create: a tag plus forwarded attributes.
///
/// Balancing never reads either; they only decide what the host renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
        }
    }

    /// Attribute value, if set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
