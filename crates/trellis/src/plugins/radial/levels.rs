//! Longest-path level assignment
//!
//! A root is a node with no incoming link. Each node's level is the greatest
//! number of links on any path from a root to it. The walk is depth-first
//! over an explicit stack, re-descending into a node whenever it is reached
//! at a greater depth than its recorded level.

use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, span, trace, Level};

use crate::core::{Database, GraphError, NodeId};
use crate::plugins::template::TemplateDatabase;

/// Level of every reached node; a missing id means "unknown level"
pub type LevelMap = BTreeMap<NodeId, usize>;

struct Frame {
    id: NodeId,
    depth: usize,
    next_child: usize,
}

/// Assigns hierarchical levels from the database's links
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelAssigner;

impl LevelAssigner {
    pub fn new() -> Self {
        Self
    }

    /// Compute the level map for every node reachable from a root
    ///
    /// Fails with [`GraphError::CyclicGraph`] if the links between stored
    /// nodes contain a cycle, whether or not a root reaches it. Link
    /// endpoints that are not stored nodes get no level, are not walked
    /// through and never close a cycle.
    pub fn assign(&self, database: &TemplateDatabase) -> Result<LevelMap> {
        let assign_span = span!(
            Level::DEBUG,
            "assign_levels",
            node_count = database.node_count(),
            edge_count = database.edge_count()
        );
        let _enter = assign_span.enter();

        let adjacency = database.adjacency();
        if let Some(cycle) = adjacency.find_cycle(|id| database.has_node(id)) {
            return Err(GraphError::cyclic_graph(cycle).into());
        }

        let roots = database.roots();
        trace!(root_count = roots.len(), "Collected roots");

        let mut levels = LevelMap::new();
        for root in roots {
            levels.insert(root, 0);
            let mut on_path: HashSet<NodeId> = HashSet::from([root]);
            let mut stack = vec![Frame {
                id: root,
                depth: 0,
                next_child: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                let Some(&child) = adjacency.children_of(frame.id).get(frame.next_child) else {
                    let done = frame.id;
                    on_path.remove(&done);
                    stack.pop();
                    continue;
                };
                frame.next_child += 1;
                let depth = frame.depth + 1;

                if on_path.contains(&child) {
                    let mut cycle: Vec<NodeId> = stack
                        .iter()
                        .map(|f| f.id)
                        .skip_while(|&id| id != child)
                        .collect();
                    cycle.push(child);
                    return Err(GraphError::cyclic_graph(cycle).into());
                }

                if !database.has_node(child) {
                    trace!(node_id = %child, "Skipping link to unknown node");
                    continue;
                }

                if levels.get(&child).is_some_and(|&level| level >= depth) {
                    continue;
                }

                levels.insert(child, depth);
                on_path.insert(child);
                stack.push(Frame {
                    id: child,
                    depth,
                    next_child: 0,
                });
            }
        }

        debug!(
            assigned = levels.len(),
            max_level = levels.values().max().copied().unwrap_or(0),
            "Assigned levels"
        );
        Ok(levels)
    }
}
