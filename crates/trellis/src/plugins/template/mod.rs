//! Template hierarchy plugin
//!
//! Loads graph documents into the shared database the other plugins read.

mod database;
mod parser;

pub use database::TemplateDatabase;
pub use parser::TemplateParser;
