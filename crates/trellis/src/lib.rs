//! Trellis - Radial layout and class-diagram export for template hierarchies
//!
//! A library for loading a graph of typed template nodes, placing it on
//! concentric rings by hierarchy level, and serializing it to Mermaid
//! `classDiagram` markup.
//!
//! # Quick Start
//!
//! ```rust
//! use trellis::convert;
//!
//! let input = r#"{
//!     "nodes": [
//!         {"id": 1, "name": "Root", "type": "template"},
//!         {"id": 2, "name": "Leaf A", "type": "field", "section": 1}
//!     ],
//!     "links": [{"source": 1, "target": 2}]
//! }"#;
//! let markup = convert(input).unwrap();
//! assert!(markup.contains("Root_1 -- Leaf_A_2"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! let input = r#"[{"id": 1, "name": "Root", "type": "template"}]"#;
//!
//! // Parse into a database
//! let parser = TemplateParser::new();
//! let mut database = TemplateDatabase::new();
//! parser.parse(input, &mut database).unwrap();
//! assert_eq!(database.node_count(), 1);
//!
//! // Place nodes on rings; coordinates are written onto the nodes
//! let layout = RadialLayoutAlgorithm::new();
//! let result = layout.apply(&mut database).unwrap();
//! assert_eq!(result.levels[&NodeId(1)], 0);
//! assert!(database.get_node(NodeId(1)).unwrap().position().is_some());
//!
//! // Serialize to class-diagram markup
//! let renderer = ClassDiagramRenderer::new();
//! let markup = renderer.render(&database).unwrap();
//! assert!(markup.contains("<<template>>"));
//! ```

pub mod core;
pub mod plugins;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, GraphError, LayoutAlgorithm, Link, Node, NodeId, Parser, Renderer,
    };
    pub use crate::plugins::class::{ClassDiagramRenderer, StrategyTable, TypeStrategy};
    pub use crate::plugins::orchestrator::{LayoutDocument, Orchestrator};
    pub use crate::plugins::radial::{RadialConfig, RadialLayoutAlgorithm};
    pub use crate::plugins::template::{TemplateDatabase, TemplateParser};
}

/// Convert a graph document to class-diagram markup
///
/// # Example
/// ```rust
/// use trellis::convert;
///
/// let markup = convert(r#"{"nodes": []}"#).unwrap();
/// assert_eq!(markup, "classDiagram\n");
/// ```
pub fn convert(input: &str) -> anyhow::Result<String> {
    plugins::orchestrator::Orchestrator::new().convert(input)
}

/// Lay out a graph document with the given configuration
///
/// # Example
/// ```rust
/// use trellis::{layout, NodeId};
/// use trellis::plugins::radial::RadialConfig;
///
/// let input = r#"{"nodes": [{"id": 1}, {"id": 2}], "links": [{"source": 1, "target": 2}]}"#;
/// let document = layout(input, RadialConfig::default()).unwrap();
/// assert_eq!(document.levels[&NodeId(2)], 1);
/// ```
pub fn layout(
    input: &str,
    config: plugins::radial::RadialConfig,
) -> anyhow::Result<plugins::orchestrator::LayoutDocument> {
    plugins::orchestrator::Orchestrator::new()
        .with_config(config)
        .layout(input)
}

/// Parse a graph document into a database without further processing
///
/// # Example
/// ```rust
/// use trellis::{parse, NodeId};
/// use trellis::prelude::Database;
///
/// let db = parse(r#"{"nodes": [{"id": 1, "name": "Root"}], "links": []}"#).unwrap();
/// assert_eq!(db.node_count(), 1);
/// assert_eq!(db.find_by_name("root").unwrap().id, NodeId(1));
/// ```
pub fn parse(input: &str) -> anyhow::Result<plugins::template::TemplateDatabase> {
    plugins::orchestrator::Orchestrator::new().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_bare_node_list() {
        let markup = convert(r#"[{"id": 4, "name": "Solo", "type": "branch"}]"#).unwrap();
        assert!(markup.contains("    class Solo_4 {\n      <<branch>>\n      +condition : bool\n    }\n"));
    }

    #[test]
    fn test_layout_rejects_cycle() {
        let input = r#"{"nodes": [{"id": 1}, {"id": 2}],
            "links": [{"source": 1, "target": 2}, {"source": 2, "target": 1}]}"#;
        let err = layout(input, plugins::radial::RadialConfig::default()).unwrap_err();
        assert!(err.downcast_ref::<GraphError>().unwrap().is_cycle());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::ParseError { .. })
        ));
    }
}
