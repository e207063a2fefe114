//! Effect collection model, mutation engine and change events.

/// Typed change notifications emitted by the store.
pub mod events;
/// Collection container and ID-to-position resolution.
pub mod model;
/// Mutation engine over the collection.
pub mod store;
