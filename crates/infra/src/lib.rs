//! Infrastructure layer: store implementations behind the domain seams.

pub mod accounts;
pub mod repository;

pub use accounts::InMemoryAccountStore;
pub use repository::{InMemoryRepository, Repository};
