//! Repository port traits for region storage.

use async_trait::async_trait;
use claimward_domain::{Region, WorldName};

use super::error::RepoError;

// =============================================================================
// Region Storage
// =============================================================================

/// Durable storage for the regions of each world.
///
/// `save` replaces everything stored for the world with `regions`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionStore: Send + Sync {
    /// Stored regions of a world. A world never saved yields an empty list.
    async fn load(&self, world: &WorldName) -> Result<Vec<Region>, RepoError>;
    async fn save(&self, world: &WorldName, regions: &[Region]) -> Result<(), RepoError>;
    async fn list_worlds(&self) -> Result<Vec<WorldName>, RepoError>;
}
