//! CLI command implementations.

pub mod common;
pub mod compile;
pub mod topology;
pub mod version;
