//! In-memory region storage for tests and ephemeral servers.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use claimward_domain::{Region, WorldName};

use crate::infrastructure::ports::{RegionStore, RepoError};

/// [`RegionStore`] keeping the last saved snapshot of each world in a map.
#[derive(Default)]
pub struct InMemoryRegionStore {
    worlds: DashMap<WorldName, Vec<Region>>,
    saves: AtomicUsize,
}

impl InMemoryRegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a world as if it had been saved earlier.
    pub fn with_world(self, world: WorldName, regions: Vec<Region>) -> Self {
        self.worlds.insert(world, regions);
        self
    }

    /// Last saved regions of a world.
    pub fn saved(&self, world: &WorldName) -> Option<Vec<Region>> {
        self.worlds.get(world).map(|r| r.value().clone())
    }

    /// Number of successful saves since creation.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegionStore for InMemoryRegionStore {
    async fn load(&self, world: &WorldName) -> Result<Vec<Region>, RepoError> {
        Ok(self.saved(world).unwrap_or_default())
    }

    async fn save(&self, world: &WorldName, regions: &[Region]) -> Result<(), RepoError> {
        self.worlds.insert(world.clone(), regions.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_worlds(&self) -> Result<Vec<WorldName>, RepoError> {
        let mut worlds: Vec<WorldName> = self.worlds.iter().map(|e| e.key().clone()).collect();
        worlds.sort();
        Ok(worlds)
    }
}
