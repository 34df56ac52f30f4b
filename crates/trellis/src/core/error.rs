//! Core error types for graph processing
//!
//! This module defines the error types shared by the parser, the layout
//! plugins and the class-diagram serializer.

use thiserror::Error;

use super::NodeId;

/// Core error types for graph processing
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Cyclic graph: {}", format_cycle(.cycle))]
    CyclicGraph { cycle: Vec<NodeId> },

    #[error("Layout error: {message}")]
    LayoutError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

fn format_cycle(cycle: &[NodeId]) -> String {
    cycle
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl GraphError {
    /// Create a new parse error
    pub fn parse_error(message: String, line: usize, column: usize) -> Self {
        Self::ParseError {
            message,
            line,
            column,
        }
    }

    /// Create a cyclic graph error naming the ids found on the cycle
    pub fn cyclic_graph(cycle: Vec<NodeId>) -> Self {
        Self::CyclicGraph { cycle }
    }

    /// Create a new layout error
    pub fn layout_error(message: String) -> Self {
        Self::LayoutError { message }
    }

    /// Create a new render error
    pub fn render_error(message: String) -> Self {
        Self::RenderError { message }
    }

    /// Create a new database error
    pub fn database_error(message: String) -> Self {
        Self::DatabaseError { message }
    }

    /// Returns true for the cyclic graph condition
    pub fn is_cycle(&self) -> bool {
        matches!(self, GraphError::CyclicGraph { .. })
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string(), err.line(), err.column())
    }
}
