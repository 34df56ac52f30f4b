//! Core abstractions for graph processing
//!
//! This module defines the data model, the adjacency index and the traits
//! every plugin implements.

mod adjacency;
mod database;
mod error;
mod layout;
pub mod logging;
mod parser;
mod renderer;
mod types;

pub use adjacency::*;
pub use database::*;
pub use error::*;
pub use layout::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use types::*;
