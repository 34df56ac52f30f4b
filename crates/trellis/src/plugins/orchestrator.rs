//! Plugin orchestrator for coordinating the processing pipeline
//!
//! Two pipelines share the parser:
//! Parser → Database → Radial layout → layout document, and
//! Parser → Database → Class diagram renderer → markup.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, span, warn, Level};

use crate::core::{Database, GraphError, LayoutAlgorithm, Link, Node, NodeId, Parser, Renderer};
use crate::plugins::class::{ClassDiagramRenderer, StrategyTable};
use crate::plugins::radial::{LevelMap, RadialConfig, RadialLayoutAlgorithm, RadialLayoutResult};
use crate::plugins::template::{TemplateDatabase, TemplateParser};

/// Laid-out graph, ready to hand to a drawing front end
#[derive(Debug, Clone, Serialize)]
pub struct LayoutDocument {
    /// Nodes in input order, carrying `x`/`y` when placed
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub children: BTreeMap<NodeId, Vec<NodeId>>,
    pub parents: BTreeMap<NodeId, Vec<NodeId>>,
    pub levels: LevelMap,
    pub unplaced: Vec<NodeId>,
}

impl LayoutDocument {
    fn new(database: &TemplateDatabase, result: RadialLayoutResult) -> Self {
        let adjacency = database.adjacency();
        Self {
            nodes: database.nodes().cloned().collect(),
            links: database.edges().copied().collect(),
            children: adjacency.children_map(),
            parents: adjacency.parents_map(),
            levels: result.levels,
            unplaced: result.unplaced,
        }
    }
}

/// Structural summary of a graph document
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub node_count: usize,
    pub link_count: usize,
    pub roots: Vec<NodeId>,
    /// Links with an endpoint that is not a stored node
    pub dangling_links: Vec<Link>,
    pub unplaced: Vec<NodeId>,
    /// Deepest level, absent when no node was placed
    pub max_level: Option<usize>,
}

impl ValidationReport {
    /// No dangling links and every node placed
    pub fn is_clean(&self) -> bool {
        self.dangling_links.is_empty() && self.unplaced.is_empty()
    }
}

/// Plugin orchestrator that coordinates the entire pipeline
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    parser: TemplateParser,
    layout: RadialLayoutAlgorithm,
    renderer: ClassDiagramRenderer,
}

impl Orchestrator {
    /// Create an orchestrator with default configuration and strategies
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom layout configuration
    pub fn with_config(mut self, config: RadialConfig) -> Self {
        self.layout = RadialLayoutAlgorithm::with_config(config);
        self
    }

    /// Use a custom strategy table for class-diagram output
    pub fn with_table(mut self, table: StrategyTable) -> Self {
        self.renderer = ClassDiagramRenderer::with_table(table);
        self
    }

    pub fn config(&self) -> &RadialConfig {
        self.layout.config()
    }

    pub fn table(&self) -> &StrategyTable {
        self.renderer.table()
    }

    /// Parse a graph document into a fresh database
    pub fn parse(&self, input: &str) -> Result<TemplateDatabase> {
        if !self.parser.can_parse(input) {
            return Err(GraphError::parse_error(
                "input is not a JSON object or array".to_string(),
                1,
                1,
            )
            .into());
        }
        let mut database = TemplateDatabase::new();
        self.parser.parse(input, &mut database)?;
        Ok(database)
    }

    /// Parse and serialize to class-diagram markup
    pub fn convert(&self, input: &str) -> Result<String> {
        let convert_span = span!(Level::INFO, "convert", input_len = input.len());
        let _enter = convert_span.enter();

        let parse_span = span!(Level::DEBUG, "pipeline_parse");
        let _parse_enter = parse_span.enter();
        let database = self.parse(input)?;
        drop(_parse_enter);

        let render_span = span!(Level::DEBUG, "pipeline_render");
        let _render_enter = render_span.enter();
        let markup = self.renderer.render(&database)?;
        debug!(output_len = markup.len(), "Rendering completed");
        drop(_render_enter);

        info!("Convert pipeline completed");
        Ok(markup)
    }

    /// Parse, lay out and assemble the layout document
    pub fn layout(&self, input: &str) -> Result<LayoutDocument> {
        let layout_span = span!(Level::INFO, "layout_pipeline", input_len = input.len());
        let _enter = layout_span.enter();

        let mut database = self.parse(input)?;
        let result = self.layout.apply(&mut database)?;
        debug!(
            placed = result.placements.len(),
            unplaced = result.unplaced.len(),
            "Layout completed"
        );

        info!("Layout pipeline completed");
        Ok(LayoutDocument::new(&database, result))
    }

    /// Parse and check the document without producing output
    ///
    /// Fails on malformed input and on cyclic links; everything else is
    /// reported.
    pub fn validate(&self, input: &str) -> Result<ValidationReport> {
        let validate_span = span!(Level::INFO, "validate", input_len = input.len());
        let _enter = validate_span.enter();

        let database = self.parse(input)?;
        let result = self.layout.layout(&database)?;

        let dangling_links: Vec<Link> = database.dangling_links().into_iter().copied().collect();
        if !dangling_links.is_empty() {
            warn!(count = dangling_links.len(), "Document has dangling links");
        }

        Ok(ValidationReport {
            node_count: database.node_count(),
            link_count: database.edge_count(),
            roots: database.roots(),
            dangling_links,
            max_level: result.levels.values().max().copied(),
            unplaced: result.unplaced,
        })
    }

    /// Layout algorithm name and version
    pub fn layout_info(&self) -> (&'static str, &'static str) {
        (self.layout.name(), self.layout.version())
    }

    /// Renderer name and output format
    pub fn renderer_info(&self) -> (&'static str, &'static str) {
        (self.renderer.name(), self.renderer.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"{
        "nodes": [
            {"id": 1, "name": "Root", "type": "template"},
            {"id": 2, "name": "Leaf A", "type": "field", "section": 1},
            {"id": 3, "name": "Leaf B", "type": "field", "section": 1}
        ],
        "links": [{"source": 1, "target": 2}, {"source": 1, "target": 3}]
    }"#;

    #[test]
    fn test_convert_example() {
        let markup = Orchestrator::new().convert(EXAMPLE).unwrap();
        assert!(markup.starts_with("classDiagram\n"));
        assert!(markup.contains("    Root_1 -- Leaf_A_2\n"));
        assert!(markup.contains("    Root_1 -- Leaf_B_3\n"));
    }

    #[test]
    fn test_layout_document() {
        let document = Orchestrator::new().layout(EXAMPLE).unwrap();
        assert_eq!(document.nodes.len(), 3);
        assert!(document.nodes.iter().all(|n| n.position().is_some()));
        assert_eq!(document.children[&NodeId(1)], vec![NodeId(2), NodeId(3)]);
        assert_eq!(document.parents[&NodeId(3)], vec![NodeId(1)]);
        assert_eq!(document.levels[&NodeId(2)], 1);
        assert!(document.unplaced.is_empty());
    }

    #[test]
    fn test_layout_document_json_shape() {
        let document = Orchestrator::new().layout(EXAMPLE).unwrap();
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["levels"]["1"], 0);
        assert_eq!(value["children"]["1"], serde_json::json!([2, 3]));
        assert!(value["nodes"][0]["x"].is_number());
        assert_eq!(value["nodes"][1]["section"], 1);
    }

    #[test]
    fn test_validate_reports_problems() {
        let input = r#"{
            "nodes": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}],
            "links": [{"source": 9, "target": 2}]
        }"#;
        let report = Orchestrator::new().validate(input).unwrap();
        assert_eq!(report.roots, vec![NodeId(1)]);
        assert_eq!(report.dangling_links, vec![Link::new(9, 2)]);
        assert_eq!(report.unplaced, vec![NodeId(2)]);
        assert_eq!(report.max_level, Some(0));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_validate_rejects_cycle() {
        let input = r#"{
            "nodes": [{"id": 1}, {"id": 2}],
            "links": [{"source": 1, "target": 2}, {"source": 2, "target": 1}]
        }"#;
        let err = Orchestrator::new().validate(input).unwrap_err();
        assert!(err.downcast_ref::<GraphError>().unwrap().is_cycle());
    }

    #[test]
    fn test_with_config() {
        let orchestrator = Orchestrator::new().with_config(RadialConfig::new(100.0, 100.0, 1.0));
        assert_eq!(orchestrator.config().width, 100.0);
        assert_eq!(orchestrator.layout_info(), ("radial", "0.1.0"));
        assert_eq!(orchestrator.renderer_info(), ("class-diagram", "mermaid"));
    }

    #[test]
    fn test_non_json_input_rejected_early() {
        let err = Orchestrator::new().convert("classDiagram\n").unwrap_err();
        assert!(err.to_string().contains("not a JSON object or array"));
    }

    #[test]
    fn test_convert_does_not_need_acyclic_links() {
        let input = r#"{
            "nodes": [{"id": 1, "name": "A", "type": "template"}],
            "links": [{"source": 1, "target": 1}]
        }"#;
        assert!(Orchestrator::new().convert(input).is_ok());
    }
}
