/// PR mock - person/identity registry stand-in for integration testing
///
/// Exposes HTTP endpoints to create persons, attach identities to them and
/// match or query their biographic attributes. All state is in memory.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod server;
