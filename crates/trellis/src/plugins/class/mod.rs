//! Class diagram plugin
//!
//! Serializes typed template nodes to Mermaid class-diagram markup through a
//! per-type strategy table.

mod renderer;
mod sanitize;
mod strategy;

pub use renderer::ClassDiagramRenderer;
pub use sanitize::{identifier, sanitize};
pub use strategy::{EdgeFormatter, InnerFormatter, RelationField, StrategyTable, TypeStrategy};
