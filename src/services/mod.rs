//! File-backed services for the host
//!
//! - Dataset loading from JSON or CSV
//! - Grid definitions (columns and options) from YAML or JSON

pub mod dataset;
pub mod definition;

pub use dataset::load_rows;
pub use definition::GridDefinition;
