//! Effect records and their configuration values.

/// Config value model and shallow merge.
pub mod config;
/// Effect, draft and patch types.
pub mod model;
