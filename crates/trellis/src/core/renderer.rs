//! Core renderer trait for graph output
//!
//! This trait defines the interface for turning graph data into an
//! output format such as class-diagram markup.

use anyhow::Result;

use super::Database;

/// Core trait for graph renderers
///
/// # Example
/// ```
/// use trellis::core::Renderer;
/// use trellis::plugins::class::ClassDiagramRenderer;
/// use trellis::plugins::template::TemplateDatabase;
///
/// let db = TemplateDatabase::new();
/// let renderer = ClassDiagramRenderer::new();
/// assert_eq!(renderer.render(&db).unwrap(), "classDiagram\n");
/// ```
pub trait Renderer<D: Database>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the database into the output format
    fn render(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
