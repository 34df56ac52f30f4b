//! Template hierarchy database
//!
//! Stores the typed nodes and the layout links of one template hierarchy,
//! together with the adjacency index derived from the links. This is the
//! context object both the radial layout and the class-diagram renderer read.

use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::core::{AdjacencyIndex, Database, GraphError, Link, Neighborhood, Node, NodeId};

/// Template hierarchy database
///
/// Keeps nodes in insertion order for deterministic layout and output.
#[derive(Debug, Clone, Default)]
pub struct TemplateDatabase {
    /// Nodes in insertion order
    nodes: Vec<Node>,
    /// Position of each node in `nodes`
    index: HashMap<NodeId, usize>,
    /// Links in insertion order
    links: Vec<Link>,
    /// Children/parents tables, kept in step with `links`
    adjacency: AdjacencyIndex,
}

impl TemplateDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from a node list and a link list
    pub fn from_parts(nodes: Vec<Node>, links: Vec<Link>) -> Result<Self> {
        let mut database = Self::new();
        for node in nodes {
            database.add_node(node)?;
        }
        for link in links {
            database.add_edge(link)?;
        }
        Ok(database)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get a mutable node by ID
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let pos = *self.index.get(&id)?;
        self.nodes.get_mut(pos)
    }

    /// Iterate mutably over all nodes in insertion order
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// The adjacency index over the stored links
    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Nodes with no incoming link, in insertion order
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| !self.adjacency.has_parents(n.id))
            .map(|n| n.id)
            .collect()
    }

    /// Parents and children of a node
    pub fn neighborhood(&self, id: NodeId) -> Neighborhood {
        self.adjacency.neighborhood(id)
    }

    /// Find a node by exact name, ignoring case and surrounding whitespace
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        let term = name.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        self.nodes.iter().find(|n| n.name.to_lowercase() == term)
    }

    /// Non-empty node names in autocomplete order
    ///
    /// Names compare by their lowercase form. Accents are not folded, so
    /// `"Émile"` sorts after `"Zed"`. Names equal apart from case fall back
    /// to ordinal order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .nodes
            .iter()
            .map(|n| n.name.as_str())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort_by_cached_key(|name| (name.to_lowercase(), *name));
        names
    }

    /// Links whose source or target is not a stored node
    pub fn dangling_links(&self) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|l| !self.has_node(l.source) || !self.has_node(l.target))
            .collect()
    }
}

impl Database for TemplateDatabase {
    type Node = Node;
    type Edge = Link;

    fn add_node(&mut self, node: Node) -> Result<()> {
        trace!(node_id = %node.id, node_name = %node.name, node_type = %node.node_type, "Adding node to database");
        if self.index.contains_key(&node.id) {
            return Err(GraphError::database_error(format!("duplicate node id {}", node.id)).into());
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        debug!(node_count = self.node_count(), "Node added");
        Ok(())
    }

    fn add_edge(&mut self, edge: Link) -> Result<()> {
        trace!(source = %edge.source, target = %edge.target, "Adding link to database");
        self.adjacency.insert(&edge);
        self.links.push(edge);
        debug!(edge_count = self.edge_count(), "Link added");
        Ok(())
    }

    fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).and_then(|&pos| self.nodes.get(pos))
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.links.clear();
        self.adjacency = AdjacencyIndex::new();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.links.len()
    }
}

// Convenience methods for adding nodes/links with less boilerplate
impl TemplateDatabase {
    /// Add a node with the given id, name and type tag
    pub fn add_simple_node(&mut self, id: u64, name: &str, node_type: &str) -> Result<()> {
        self.add_node(Node::new(id, name, node_type))
    }

    /// Add a link from `source` to `target`
    pub fn add_link(&mut self, source: u64, target: u64) -> Result<()> {
        self.add_edge(Link::new(source, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TemplateDatabase {
        let mut db = TemplateDatabase::new();
        db.add_simple_node(1, "Root", "template").unwrap();
        db.add_simple_node(2, "leaf a", "field").unwrap();
        db.add_simple_node(3, "Leaf B", "field").unwrap();
        db.add_link(1, 2).unwrap();
        db.add_link(1, 3).unwrap();
        db
    }

    #[test]
    fn test_add_and_get() {
        let db = sample();
        assert_eq!(db.node_count(), 3);
        assert_eq!(db.edge_count(), 2);
        assert_eq!(db.get_node(NodeId(2)).unwrap().name, "leaf a");
        assert!(db.get_node(NodeId(9)).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut db = sample();
        let err = db.add_simple_node(1, "Again", "template").unwrap_err();
        let graph_err = err.downcast_ref::<GraphError>().unwrap();
        assert!(matches!(graph_err, GraphError::DatabaseError { .. }));
        assert_eq!(db.node_count(), 3);
    }

    #[test]
    fn test_insertion_order() {
        let db = sample();
        let ids: Vec<_> = db.nodes().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_roots() {
        let db = sample();
        assert_eq!(db.roots(), vec![NodeId(1)]);
    }

    #[test]
    fn test_adjacency_tracks_links() {
        let db = sample();
        assert_eq!(db.adjacency().children_of(NodeId(1)), &[NodeId(2), NodeId(3)]);
        assert_eq!(db.neighborhood(NodeId(3)).parents, vec![NodeId(1)]);
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let db = sample();
        assert_eq!(db.find_by_name("LEAF A").unwrap().id, NodeId(2));
        assert_eq!(db.find_by_name("  root ").unwrap().id, NodeId(1));
        assert!(db.find_by_name("leaf").is_none());
        assert!(db.find_by_name("   ").is_none());
    }

    #[test]
    fn test_sorted_names() {
        let mut db = sample();
        db.add_simple_node(4, "", "field").unwrap();
        assert_eq!(db.sorted_names(), vec!["leaf a", "Leaf B", "Root"]);
    }

    #[test]
    fn test_sorted_names_case_ties_and_accents() {
        let mut db = TemplateDatabase::new();
        db.add_simple_node(1, "root", "template").unwrap();
        db.add_simple_node(2, "Zed", "field").unwrap();
        db.add_simple_node(3, "Émile", "field").unwrap();
        db.add_simple_node(4, "Root", "field").unwrap();
        db.add_simple_node(5, "emma", "field").unwrap();
        assert_eq!(db.sorted_names(), vec!["emma", "Root", "root", "Zed", "Émile"]);
    }

    #[test]
    fn test_dangling_links() {
        let mut db = sample();
        db.add_link(3, 42).unwrap();
        let dangling = db.dangling_links();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].target, NodeId(42));
    }

    #[test]
    fn test_clear() {
        let mut db = sample();
        db.clear();
        assert_eq!(db.node_count(), 0);
        assert_eq!(db.edge_count(), 0);
        assert!(db.adjacency().is_empty());
    }
}
