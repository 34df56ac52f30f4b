//! Per-type formatting strategies
//!
//! Each node type tag maps to a [`TypeStrategy`] describing its stereotype,
//! the member lines inside its class block, the arrow token of its relations
//! and which node field the relation targets come from. Unknown tags resolve
//! to the table's default entry.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::{Node, NodeId};

/// Node field that supplies relation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationField {
    /// The single `rootId` field
    RootId,
    /// The single `section` field
    Section,
    /// The `bases` list, in list order
    Bases,
}

impl RelationField {
    /// Relation targets of `node`, in field order
    pub fn targets(self, node: &Node) -> Vec<NodeId> {
        match self {
            RelationField::RootId => node.root_id.into_iter().collect(),
            RelationField::Section => node.section.into_iter().collect(),
            RelationField::Bases => node.bases.clone(),
        }
    }
}

impl fmt::Display for RelationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationField::RootId => "rootId",
            RelationField::Section => "section",
            RelationField::Bases => "bases",
        };
        write!(f, "{}", name)
    }
}

/// Member lines written inside a node's class block
pub type InnerFormatter = Arc<dyn Fn(&Node) -> Vec<String> + Send + Sync>;

/// Arrow token between a node's parent identifier and its own
pub type EdgeFormatter = Arc<dyn Fn(&Node) -> String + Send + Sync>;

/// Formatting rules for one node type
///
/// Member lines and the edge token are computed per node, so a registered
/// type may derive them from the node's name or relation fields.
#[derive(Clone)]
pub struct TypeStrategy {
    pub stereotype: String,
    inner: InnerFormatter,
    edge: EdgeFormatter,
    pub relation: RelationField,
}

impl TypeStrategy {
    /// A strategy with no member lines and a fixed edge token
    pub fn new(stereotype: impl Into<String>, edge: impl Into<String>, relation: RelationField) -> Self {
        let edge = edge.into();
        Self {
            stereotype: stereotype.into(),
            inner: Arc::new(|_| Vec::new()),
            edge: Arc::new(move |_| edge.clone()),
            relation,
        }
    }

    /// Append a fixed member line
    pub fn with_inner(mut self, line: impl Into<String>) -> Self {
        let previous = Arc::clone(&self.inner);
        let line = line.into();
        self.inner = Arc::new(move |node| {
            let mut lines = previous(node);
            lines.push(line.clone());
            lines
        });
        self
    }

    /// Replace the member lines with a per-node formatter
    pub fn with_inner_fn<F>(mut self, inner: F) -> Self
    where
        F: Fn(&Node) -> Vec<String> + Send + Sync + 'static,
    {
        self.inner = Arc::new(inner);
        self
    }

    /// Replace the edge token with a per-node formatter
    pub fn with_edge_fn<F>(mut self, edge: F) -> Self
    where
        F: Fn(&Node) -> String + Send + Sync + 'static,
    {
        self.edge = Arc::new(edge);
        self
    }

    /// Member lines for `node`
    pub fn inner_lines(&self, node: &Node) -> Vec<String> {
        (self.inner)(node)
    }

    /// Edge token for relations ending at `node`
    pub fn edge_token(&self, node: &Node) -> String {
        (self.edge)(node)
    }

    // Unnamed node carrying only the stereotype, for previews
    fn sample(&self) -> Node {
        Node::new(0u64, "", self.stereotype.as_str())
    }
}

impl fmt::Debug for TypeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeStrategy")
            .field("stereotype", &self.stereotype)
            .field("relation", &self.relation)
            .finish_non_exhaustive()
    }
}

/// Serializes the formatters' output for an unnamed node with id 0
impl Serialize for TypeStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sample = self.sample();
        let mut state = serializer.serialize_struct("TypeStrategy", 4)?;
        state.serialize_field("stereotype", &self.stereotype)?;
        state.serialize_field("inner", &self.inner_lines(&sample))?;
        state.serialize_field("edge", &self.edge_token(&sample))?;
        state.serialize_field("relation", &self.relation)?;
        state.end()
    }
}

/// Lookup table from type tag to strategy, with a default entry
#[derive(Debug, Clone, Serialize)]
pub struct StrategyTable {
    entries: BTreeMap<String, TypeStrategy>,
    fallback: TypeStrategy,
}

impl Default for StrategyTable {
    fn default() -> Self {
        let mut table = Self::with_fallback(Self::default_entry());
        table.register(
            "template",
            TypeStrategy::new("template", "--|>", RelationField::RootId),
        );
        table.register(
            "section",
            TypeStrategy::new("section", "<|--", RelationField::Bases),
        );
        table.register(
            "branch",
            TypeStrategy::new("branch", "o--", RelationField::RootId).with_inner("+condition : bool"),
        );
        table.register(
            "field",
            TypeStrategy::new("field", "--", RelationField::Section).with_inner("+value : string"),
        );
        table
    }
}

impl StrategyTable {
    /// The built-in table: template, section, branch and field
    ///
    /// Member lines use Mermaid's `+name : type` attribute form (visibility
    /// marker, name, then the type after a spaced colon).
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table that resolves every tag to `fallback`
    pub fn with_fallback(fallback: TypeStrategy) -> Self {
        Self {
            entries: BTreeMap::new(),
            fallback,
        }
    }

    /// Entry used for unknown tags: section formatting related through `rootId`
    pub fn default_entry() -> TypeStrategy {
        TypeStrategy::new("section", "<|--", RelationField::RootId)
    }

    /// Add or replace the strategy for a type tag
    pub fn register(&mut self, tag: impl Into<String>, strategy: TypeStrategy) -> Option<TypeStrategy> {
        self.entries.insert(tag.into(), strategy)
    }

    /// Exact lookup without fallback
    pub fn get(&self, tag: &str) -> Option<&TypeStrategy> {
        self.entries.get(tag)
    }

    /// Lookup that falls back to the default entry
    pub fn resolve(&self, tag: &str) -> &TypeStrategy {
        self.entries.get(tag).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &TypeStrategy {
        &self.fallback
    }

    /// Registered entries ordered by tag
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeStrategy)> {
        self.entries.iter().map(|(tag, strategy)| (tag.as_str(), strategy))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
