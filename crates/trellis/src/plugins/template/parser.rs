//! Template document parser
//!
//! Reads a JSON graph document into a [`TemplateDatabase`]. Two shapes are
//! accepted: an object with `nodes` and `links` arrays, or a bare array of
//! nodes (no links).

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, span, trace, Level};

use super::TemplateDatabase;
use crate::core::{Database, GraphError, Link, Node, Parser};

/// On-disk shape of a graph document
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Graph {
        nodes: Vec<Node>,
        #[serde(default)]
        links: Vec<Link>,
    },
    NodeList(Vec<Node>),
}

/// JSON parser for template hierarchy documents
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateParser;

impl TemplateParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser<TemplateDatabase> for TemplateParser {
    fn parse(&self, input: &str, database: &mut TemplateDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_template", input_len = input.len());
        let _enter = parse_span.enter();

        trace!("Starting template document parsing");

        // Parse to a value first so syntax errors keep their line/column.
        let value: serde_json::Value = serde_json::from_str(input).map_err(GraphError::from)?;
        let document = Document::deserialize(value).map_err(|e| {
            GraphError::parse_error(
                format!("expected a graph object or a node array: {}", e),
                0,
                0,
            )
        })?;

        let (nodes, links) = match document {
            Document::Graph { nodes, links } => (nodes, links),
            Document::NodeList(nodes) => {
                debug!("Bare node list, no links");
                (nodes, Vec::new())
            }
        };

        for node in nodes {
            database.add_node(node)?;
        }
        for link in links {
            database.add_edge(link)?;
        }

        info!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "template-json"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        let trimmed = input.trim_start();
        trimmed.starts_with('{') || trimmed.starts_with('[')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeId;

    #[test]
    fn test_parser_metadata() {
        let parser = TemplateParser::new();
        assert_eq!(parser.name(), "template-json");
        assert_eq!(parser.version(), "0.1.0");
    }

    #[test]
    fn test_can_parse() {
        let parser = TemplateParser::new();
        assert!(parser.can_parse("  {\"nodes\": []}"));
        assert!(parser.can_parse("[]"));
        assert!(!parser.can_parse("classDiagram"));
    }

    #[test]
    fn test_parse_graph_document() {
        let input = r#"{
            "nodes": [
                {"id": 1, "name": "Root", "type": "template"},
                {"id": 2, "name": "Leaf", "type": "field", "section": 1}
            ],
            "links": [{"source": 1, "target": 2}]
        }"#;
        let mut db = TemplateDatabase::new();
        TemplateParser::new().parse(input, &mut db).unwrap();
        assert_eq!(db.node_count(), 2);
        assert_eq!(db.edge_count(), 1);
        assert_eq!(db.get_node(NodeId(2)).unwrap().section, Some(NodeId(1)));
    }

    #[test]
    fn test_parse_missing_links() {
        let mut db = TemplateDatabase::new();
        TemplateParser::new()
            .parse(r#"{"nodes": [{"id": 1, "name": "A", "type": "template"}]}"#, &mut db)
            .unwrap();
        assert_eq!(db.node_count(), 1);
        assert_eq!(db.edge_count(), 0);
    }

    #[test]
    fn test_parse_bare_node_list() {
        let input = r#"[
            {"id": 1, "name": "Root", "type": "template", "rootId": null},
            {"id": 2, "name": "Branch", "type": "branch", "rootId": 1}
        ]"#;
        let mut db = TemplateDatabase::new();
        TemplateParser::new().parse(input, &mut db).unwrap();
        assert_eq!(db.node_count(), 2);
        assert_eq!(db.edge_count(), 0);
    }

    #[test]
    fn test_parse_syntax_error_has_position() {
        let mut db = TemplateDatabase::new();
        let err = TemplateParser::new()
            .parse("{\n  \"nodes\": [\n    {\"id\": }\n  ]\n}", &mut db)
            .unwrap_err();
        match err.downcast_ref::<GraphError>() {
            Some(GraphError::ParseError { line, .. }) => assert_eq!(*line, 3),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrong_shape() {
        let mut db = TemplateDatabase::new();
        let err = TemplateParser::new().parse(r#"{"vertices": []}"#, &mut db).unwrap_err();
        assert!(err.to_string().contains("expected a graph object"));
    }

    #[test]
    fn test_parse_duplicate_ids() {
        let input = r#"[{"id": 1, "name": "A", "type": "x"}, {"id": 1, "name": "B", "type": "x"}]"#;
        let mut db = TemplateDatabase::new();
        let err = TemplateParser::new().parse(input, &mut db).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::DatabaseError { .. })
        ));
    }
}
