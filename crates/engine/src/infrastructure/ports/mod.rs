//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Region storage (could swap JSON files -> a database)
//! - Authorization (the host's permission system)
//! - Player positions (the host's world state)

mod error;
mod external;
mod repos;

pub use error::RepoError;
pub use external::{PermissionPort, PositionPort};
pub use repos::RegionStore;

#[cfg(test)]
pub use external::{MockPermissionPort, MockPositionPort};
#[cfg(test)]
pub use repos::MockRegionStore;
