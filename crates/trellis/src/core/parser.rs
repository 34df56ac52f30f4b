//! Core parser trait for graph documents
//!
//! This trait defines the interface for reading a serialized graph
//! into structured data stored in a database.

use anyhow::Result;

use super::Database;

/// Core trait for graph document parsers
///
/// # Example
/// ```
/// use trellis::core::{Database, Parser};
/// use trellis::plugins::template::{TemplateDatabase, TemplateParser};
///
/// let parser = TemplateParser::new();
/// let mut db = TemplateDatabase::new();
/// parser
///     .parse(r#"{"nodes": [{"id": 1, "name": "A", "type": "template"}], "links": []}"#, &mut db)
///     .unwrap();
/// assert_eq!(db.node_count(), 1);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse the input into the provided database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input looks like something this parser reads
    fn can_parse(&self, input: &str) -> bool;
}
