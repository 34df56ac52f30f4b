//! Core type definitions for graph processing
//!
//! This module contains the fundamental data model used throughout Trellis:
//! node identifiers, typed template nodes and directed links.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a node within one node set
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId(value)
    }
}

/// A node of the template hierarchy
///
/// `node_type` selects the class-diagram strategy. `root_id`, `section` and
/// `bases` are the serializer's relation fields; they are independent of the
/// link list used for layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(rename = "rootId", default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<NodeId>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bases: Vec<NodeId>,
    /// Horizontal position, set by the radial layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical position, set by the radial layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<NodeId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<NodeId>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Node {
    /// Create a new node without relation fields or coordinates
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            root_id: None,
            section: None,
            bases: Vec::new(),
            x: None,
            y: None,
        }
    }

    pub fn with_root(mut self, root_id: impl Into<NodeId>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<NodeId>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_bases<I, T>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    /// Coordinates assigned by the last layout pass, if any
    pub fn position(&self) -> Option<(f64, f64)> {
        self.x.zip(self.y)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = Some(x);
        self.y = Some(y);
    }

    pub fn clear_position(&mut self) {
        self.x = None;
        self.y = None;
    }
}

/// A directed link; for layout the source is the parent of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
}

impl Link {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
