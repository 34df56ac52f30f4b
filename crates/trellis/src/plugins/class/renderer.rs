//! Class diagram renderer
//!
//! Serializes typed nodes to Mermaid `classDiagram` markup. Only the node
//! relation fields are read; the link list is a layout concern.

use anyhow::Result;
use std::fmt::Write;
use tracing::{debug, info, span, trace, Level};

use super::sanitize::identifier;
use super::strategy::StrategyTable;
use crate::core::{Database, GraphError, Renderer};
use crate::plugins::template::TemplateDatabase;

const INDENT: &str = "    ";
const MEMBER_INDENT: &str = "      ";

/// Class diagram renderer
#[derive(Debug, Clone, Default)]
pub struct ClassDiagramRenderer {
    table: StrategyTable,
}

impl ClassDiagramRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom strategy table
    pub fn with_table(table: StrategyTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &StrategyTable {
        &self.table
    }

    fn write_classes(&self, database: &TemplateDatabase, out: &mut String) -> std::fmt::Result {
        for node in database.nodes() {
            let strategy = self.table.resolve(&node.node_type);
            writeln!(out, "{INDENT}class {} {{", identifier(node))?;
            writeln!(out, "{MEMBER_INDENT}<<{}>>", strategy.stereotype)?;
            for line in strategy.inner_lines(node) {
                writeln!(out, "{MEMBER_INDENT}{}", line)?;
            }
            writeln!(out, "{INDENT}}}")?;
        }
        Ok(())
    }

    fn write_relations(&self, database: &TemplateDatabase, out: &mut String) -> Result<usize, std::fmt::Error> {
        let mut written = 0;
        for node in database.nodes() {
            let strategy = self.table.resolve(&node.node_type);
            let child = identifier(node);
            for target in strategy.relation.targets(node) {
                let Some(parent) = database.get_node(target) else {
                    trace!(node_id = %node.id, target = %target, relation = %strategy.relation, "Dropping relation to unknown node");
                    continue;
                };
                writeln!(out, "{INDENT}{} {} {}", identifier(parent), strategy.edge_token(node), child)?;
                written += 1;
            }
        }
        Ok(written)
    }
}

impl Renderer<TemplateDatabase> for ClassDiagramRenderer {
    type Output = String;

    fn render(&self, database: &TemplateDatabase) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_class_diagram",
            node_count = database.node_count()
        );
        let _enter = render_span.enter();

        let mut out = String::from("classDiagram\n");
        self.write_classes(database, &mut out)
            .map_err(|e| GraphError::render_error(format!("failed to write class blocks: {}", e)))?;
        debug!(classes = database.node_count(), "Wrote class blocks");
        let relations = self
            .write_relations(database, &mut out)
            .map_err(|e| GraphError::render_error(format!("failed to write relations: {}", e)))?;

        info!(relations, output_len = out.len(), "Class diagram rendered");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "class-diagram"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "mermaid"
    }
}
