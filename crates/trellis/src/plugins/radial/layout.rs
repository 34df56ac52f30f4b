//! Radial layout implementation
//!
//! Places each level on its own ring around the canvas center. Ring `L` has
//! radius `ln(L + 2) * radius_step`, and the `k` nodes of a ring are spread
//! at equal angular steps of `2π / k` starting from angle 0.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;
use tracing::{debug, info, span, trace, warn, Level};

use super::levels::{LevelAssigner, LevelMap};
use crate::core::{Database, GraphError, LayoutAlgorithm, NodeId};
use crate::plugins::template::TemplateDatabase;

/// Layout configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    /// Canvas width; the center is at `width / 2`
    pub width: f64,
    /// Canvas height; the center is at `height / 2`
    pub height: f64,
    /// Ring spacing factor
    pub radius_step: f64,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 800.0,
            radius_step: 3200.0,
        }
    }
}

impl RadialConfig {
    pub fn new(width: f64, height: f64, radius_step: f64) -> Self {
        Self {
            width,
            height,
            radius_step,
        }
    }

    /// Canvas center
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the ring holding `level`
    pub fn ring_radius(&self, level: usize) -> f64 {
        ((level + 2) as f64).ln() * self.radius_step
    }

    /// Reject non-finite sizes and a non-positive ring spacing
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::layout_error(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                ))
                .into());
            }
        }
        if !self.radius_step.is_finite() || self.radius_step <= 0.0 {
            return Err(GraphError::layout_error(format!(
                "radius_step must be a finite positive number, got {}",
                self.radius_step
            ))
            .into());
        }
        Ok(())
    }
}

/// Position data for a placed node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub id: NodeId,
    pub level: usize,
    pub radius: f64,
    /// Angle in radians, in `[0, 2π)`
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

/// Layout output
#[derive(Debug, Clone, Default)]
pub struct RadialLayoutResult {
    /// Level of every reached node
    pub levels: LevelMap,
    /// Node ids on each ring, in node input order
    pub rings: BTreeMap<usize, Vec<NodeId>>,
    /// One placement per reached node, ring by ring
    pub placements: Vec<Placement>,
    /// Nodes no root reaches, in node input order
    pub unplaced: Vec<NodeId>,
}

impl RadialLayoutResult {
    /// Find the placement of a node
    pub fn placement(&self, id: NodeId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    /// Number of populated rings
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }
}

/// Radial layout algorithm implementation
#[derive(Debug, Clone, Default)]
pub struct RadialLayoutAlgorithm {
    config: RadialConfig,
    levels: LevelAssigner,
}

impl RadialLayoutAlgorithm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RadialConfig) -> Self {
        Self {
            config,
            levels: LevelAssigner::new(),
        }
    }

    pub fn config(&self) -> &RadialConfig {
        &self.config
    }

    /// Run the layout and write `x`/`y` onto the database's nodes
    ///
    /// Unplaced nodes have their coordinates cleared, so running twice with
    /// the same input and configuration leaves the same coordinates.
    pub fn apply(&self, database: &mut TemplateDatabase) -> Result<RadialLayoutResult> {
        let result = self.layout(database)?;
        let positions: HashMap<NodeId, (f64, f64)> = result
            .placements
            .iter()
            .map(|p| (p.id, (p.x, p.y)))
            .collect();

        for node in database.nodes_mut() {
            match positions.get(&node.id) {
                Some(&(x, y)) => node.set_position(x, y),
                None => node.clear_position(),
            }
        }
        trace!(placed = positions.len(), "Wrote coordinates onto nodes");
        Ok(result)
    }
}

impl LayoutAlgorithm<TemplateDatabase> for RadialLayoutAlgorithm {
    type Output = RadialLayoutResult;

    fn layout(&self, database: &TemplateDatabase) -> Result<Self::Output> {
        let layout_span = span!(
            Level::INFO,
            "layout_radial",
            node_count = database.node_count(),
            edge_count = database.edge_count()
        );
        let _enter = layout_span.enter();

        self.config.validate()?;
        let levels = self.levels.assign(database)?;

        // Group by level in node input order
        let mut rings: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
        let mut unplaced = Vec::new();
        for node in database.nodes() {
            match levels.get(&node.id) {
                Some(&level) => rings.entry(level).or_default().push(node.id),
                None => unplaced.push(node.id),
            }
        }
        debug!(ring_count = rings.len(), "Grouped nodes into rings");

        let (center_x, center_y) = self.config.center();
        let mut placements = Vec::with_capacity(database.node_count() - unplaced.len());
        for (&level, ids) in &rings {
            let radius = self.config.ring_radius(level);
            let angle_step = TAU / ids.len() as f64;
            trace!(level, radius, node_count = ids.len(), "Placing ring");

            for (i, &id) in ids.iter().enumerate() {
                let angle = i as f64 * angle_step;
                placements.push(Placement {
                    id,
                    level,
                    radius,
                    angle,
                    x: center_x + radius * angle.cos(),
                    y: center_y + radius * angle.sin(),
                });
            }
        }

        if !unplaced.is_empty() {
            warn!(
                unplaced = unplaced.len(),
                "{} unplaced nodes (not reachable from any root)",
                unplaced.len()
            );
        }

        info!(placed = placements.len(), rings = rings.len(), "Radial layout completed");
        Ok(RadialLayoutResult {
            levels,
            rings,
            placements,
            unplaced,
        })
    }

    fn name(&self) -> &'static str {
        "radial"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}
