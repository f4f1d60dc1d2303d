/// Person registry - in-memory persons, identities, matching and queries
///
/// The repository owns all state. Matching and querying are plain functions
/// over borrowed persons so they can be exercised without a repository.

pub mod matcher;
pub mod models;
pub mod query;
pub mod store;

pub use models::{AttributeMap, Discrepancy, Identity, MatchErrorCode, Person};
pub use query::{PersonListing, PersonQuery};
pub use store::{PersonRepository, PersonsView};
