//! CLI commands

pub mod normalize;
pub mod report;
