//! Radial layout plugin
//!
//! Assigns longest-path levels from the link list and places each level on
//! a logarithmically spaced ring.

mod layout;
mod levels;

pub use layout::{Placement, RadialConfig, RadialLayoutAlgorithm, RadialLayoutResult};
pub use levels::{LevelAssigner, LevelMap};
