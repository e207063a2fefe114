//! Effect-type discovery.

/// TTL cache in front of a registry.
pub mod cache;
/// Registry trait and descriptors.
pub mod descriptor;
