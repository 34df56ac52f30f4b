//! Bidirectional adjacency index built from a flat link list
//!
//! `children` maps a source id to the targets of its links and `parents` maps
//! a target id to the sources of its links. Both preserve link order and keep
//! duplicate links. Ids are recorded as-is; whether they exist in a node set
//! is for the consumer to decide.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

use super::{Link, NodeId};

/// Forward and reverse lookup tables over a link list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyIndex {
    children: HashMap<NodeId, Vec<NodeId>>,
    parents: HashMap<NodeId, Vec<NodeId>>,
    /// Ids in first-mention order, for deterministic iteration
    order: Vec<NodeId>,
}

/// Parents and children of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighborhood {
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
}

impl AdjacencyIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index in a single pass over `links`
    pub fn build<'a, I>(links: I) -> Self
    where
        I: IntoIterator<Item = &'a Link>,
    {
        let mut index = Self::new();
        for link in links {
            index.insert(link);
        }
        debug!(
            source_count = index.children.len(),
            target_count = index.parents.len(),
            "Built adjacency index"
        );
        index
    }

    /// Record one link
    pub fn insert(&mut self, link: &Link) {
        trace!(source = %link.source, target = %link.target, "Indexing link");
        for id in [link.source, link.target] {
            if !self.children.contains_key(&id) && !self.parents.contains_key(&id) {
                self.order.push(id);
            }
        }
        self.children
            .entry(link.source)
            .or_default()
            .push(link.target);
        self.parents
            .entry(link.target)
            .or_default()
            .push(link.source);
    }

    /// Targets of links leaving `id`, in link order
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sources of links entering `id`, in link order
    pub fn parents_of(&self, id: NodeId) -> &[NodeId] {
        self.parents.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if any link targets `id`
    pub fn has_parents(&self, id: NodeId) -> bool {
        self.parents.contains_key(&id)
    }

    /// Parents and children of `id`
    pub fn neighborhood(&self, id: NodeId) -> Neighborhood {
        Neighborhood {
            parents: self.parents_of(id).to_vec(),
            children: self.children_of(id).to_vec(),
        }
    }

    /// Every id mentioned by a link, in first-mention order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// The forward table with sorted keys
    pub fn children_map(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        self.children
            .iter()
            .map(|(&id, targets)| (id, targets.clone()))
            .collect()
    }

    /// The reverse table with sorted keys
    pub fn parents_map(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        self.parents
            .iter()
            .map(|(&id, sources)| (id, sources.clone()))
            .collect()
    }

    /// Number of distinct ids mentioned by links
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Find a cycle among the ids accepted by `is_member`
    ///
    /// Runs Kahn's algorithm over the member ids, ignoring every link with
    /// a non-member endpoint. Pass `|_| true` to search the whole index.
    /// Returns `None` for an acyclic graph, otherwise one cycle as a closed
    /// path (first id repeated at the end).
    pub fn find_cycle<F>(&self, is_member: F) -> Option<Vec<NodeId>>
    where
        F: Fn(NodeId) -> bool,
    {
        let members: Vec<NodeId> = self.order.iter().copied().filter(|&id| is_member(id)).collect();
        trace!(id_count = members.len(), "Checking for cycles");
        let mut in_degree: HashMap<NodeId, usize> = members
            .iter()
            .map(|&id| {
                let degree = self.parents_of(id).iter().filter(|&&p| is_member(p)).count();
                (id, degree)
            })
            .collect();

        let mut queue: Vec<NodeId> = members
            .iter()
            .copied()
            .filter(|id| in_degree[id] == 0)
            .collect();
        let mut removed = 0;

        while let Some(id) = queue.pop() {
            removed += 1;
            for &child in self.children_of(id) {
                if let Some(deg) = in_degree.get_mut(&child) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push(child);
                    }
                }
            }
        }

        if removed == members.len() {
            return None;
        }

        // Every remaining id has a remaining parent, so walking backwards
        // through remaining parents must eventually repeat an id.
        let remaining: HashSet<NodeId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg > 0)
            .map(|(&id, _)| id)
            .collect();
        let start = members.iter().copied().find(|id| remaining.contains(id))?;

        let mut path = vec![start];
        let mut seen: HashMap<NodeId, usize> = HashMap::from([(start, 0)]);
        let mut current = start;
        loop {
            let parent = self
                .parents_of(current)
                .iter()
                .copied()
                .find(|p| remaining.contains(p))?;
            if let Some(&pos) = seen.get(&parent) {
                let mut cycle: Vec<NodeId> = path[pos..].to_vec();
                cycle.push(parent);
                cycle.reverse();
                debug!(cycle_len = cycle.len() - 1, "Cycle detected in graph");
                return Some(cycle);
            }
            seen.insert(parent, path.len());
            path.push(parent);
            current = parent;
        }
    }
}
