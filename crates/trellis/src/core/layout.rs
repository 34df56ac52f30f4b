//! Core layout trait for graph positioning
//!
//! This trait defines the interface for arranging graph elements
//! in a coordinate system.

use anyhow::Result;

use super::Database;

/// Core trait for layout algorithms
///
/// A layout reads the database and returns its own result type. Writing
/// the result back onto the nodes is left to the algorithm's own API.
///
/// # Example
/// ```
/// use trellis::core::LayoutAlgorithm;
/// use trellis::plugins::radial::RadialLayoutAlgorithm;
/// use trellis::plugins::template::TemplateDatabase;
///
/// let db = TemplateDatabase::new();
/// let layout = RadialLayoutAlgorithm::new();
/// let result = layout.layout(&db).unwrap();
/// assert!(result.placements.is_empty());
/// ```
pub trait LayoutAlgorithm<D: Database>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange elements in the database using this layout algorithm
    fn layout(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;
}
