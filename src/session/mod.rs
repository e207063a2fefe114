//! Session-oriented editing API.

/// The studio session facade.
pub mod studio_session;
