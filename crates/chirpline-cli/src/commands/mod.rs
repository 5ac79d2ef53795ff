//! CLI command implementations

pub mod generate;
pub mod render;
pub mod simulate;
pub mod validate;
