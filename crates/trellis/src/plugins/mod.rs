//! Plugin implementations
//!
//! Each plugin implements the core traits for one stage of the pipeline:
//! `template` loads graph documents, `radial` lays them out and `class`
//! serializes them to class-diagram markup.

pub mod class;
pub mod orchestrator;
pub mod radial;
pub mod template;

pub use class::*;
pub use orchestrator::*;
pub use radial::*;
pub use template::*;
