//! CLI command implementations

pub mod dataset;
pub mod init;
pub mod predict;
