//! Shared per-world region state.
//!
//! Each world's [`RegionGraph`] sits behind one `RwLock`. Every mutation,
//! including the overlap query that precedes an admission, runs under the
//! write guard, so a read-then-insert cannot interleave with another writer
//! in the same world. Readers share the lock and only ever see whole commits.
//!
//! Saving happens after the guard is released. Each commit takes a numbered
//! snapshot while still holding the guard; [`WorldRegions::persist`] drops a
//! snapshot older than the last one written so saves can finish out of order
//! without an older state overwriting a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use claimward_domain::{LoadReport, Region, RegionGraph, SpatialIndex, WorldName};

use crate::infrastructure::chunk_index::ChunkGridIndex;
use crate::infrastructure::ports::{RegionStore, RepoError};

/// Builds an empty spatial index for a freshly loaded world.
pub type IndexFactory = Arc<dyn Fn() -> Box<dyn SpatialIndex> + Send + Sync>;

/// Regions of a world, numbered by commit.
#[derive(Debug, Clone)]
pub struct Snapshot {
    revision: u64,
    regions: Vec<Region>,
}

impl Snapshot {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

/// One loaded world.
pub struct WorldRegions {
    world: WorldName,
    graph: RwLock<RegionGraph>,
    load_report: LoadReport,
    revision: AtomicU64,
    saved: Mutex<u64>,
}

impl WorldRegions {
    pub fn new(world: WorldName, graph: RegionGraph, load_report: LoadReport) -> Self {
        Self {
            world,
            graph: RwLock::new(graph),
            load_report,
            revision: AtomicU64::new(0),
            saved: Mutex::new(0),
        }
    }

    pub fn world(&self) -> &WorldName {
        &self.world
    }

    /// What loading had to repair in the stored data.
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, RegionGraph> {
        self.graph.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, RegionGraph> {
        self.graph.write().await
    }

    /// Number the current state. Call with the write guard held, right after
    /// the commit it should capture.
    pub fn snapshot(&self, graph: &RegionGraph) -> Snapshot {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        Snapshot {
            revision,
            regions: graph.snapshot(),
        }
    }

    /// Write `snapshot` unless a newer one has been written already.
    ///
    /// Returns whether the store was called.
    pub async fn persist(
        &self,
        store: &dyn RegionStore,
        snapshot: Snapshot,
    ) -> Result<bool, RepoError> {
        let mut saved = self.saved.lock().await;
        if snapshot.revision <= *saved {
            tracing::debug!(
                world = %self.world,
                revision = snapshot.revision,
                saved = *saved,
                "Skipping stale region snapshot"
            );
            return Ok(false);
        }
        store.save(&self.world, &snapshot.regions).await?;
        *saved = snapshot.revision;
        Ok(true)
    }
}

/// Lazily loaded worlds sharing one region store.
pub struct WorldRegistry {
    store: Arc<dyn RegionStore>,
    index_factory: IndexFactory,
    worlds: DashMap<WorldName, Arc<WorldRegions>>,
    load_lock: Mutex<()>,
}

impl WorldRegistry {
    /// Registry indexing worlds with a [`ChunkGridIndex`].
    pub fn new(store: Arc<dyn RegionStore>) -> Self {
        Self::with_index(store, Arc::new(|| Box::new(ChunkGridIndex::new())))
    }

    pub fn with_index(store: Arc<dyn RegionStore>, index_factory: IndexFactory) -> Self {
        Self {
            store,
            index_factory,
            worlds: DashMap::new(),
            load_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &dyn RegionStore {
        self.store.as_ref()
    }

    fn cached(&self, world: &WorldName) -> Option<Arc<WorldRegions>> {
        self.worlds.get(world).map(|w| Arc::clone(w.value()))
    }

    /// The world's shared state, loading it from the store on first use.
    pub async fn world(&self, world: &WorldName) -> Result<Arc<WorldRegions>, RepoError> {
        if let Some(loaded) = self.cached(world) {
            return Ok(loaded);
        }

        let _guard = self.load_lock.lock().await;
        if let Some(loaded) = self.cached(world) {
            return Ok(loaded);
        }

        let stored = self.store.load(world).await?;
        let (graph, report) = RegionGraph::load(stored, (self.index_factory)());
        for (region, parent) in &report.repaired_parents {
            tracing::warn!(
                world = %world,
                region = %region,
                parent = %parent,
                "Cleared dangling or cyclic parent while loading"
            );
        }
        for duplicate in &report.duplicates {
            tracing::warn!(world = %world, region = %duplicate, "Dropped duplicate region id while loading");
        }
        tracing::info!(world = %world, regions = graph.len(), "Loaded world regions");

        let loaded = Arc::new(WorldRegions::new(world.clone(), graph, report));
        self.worlds.insert(world.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Every world loaded so far, by name.
    pub fn loaded(&self) -> Vec<Arc<WorldRegions>> {
        let mut worlds: Vec<Arc<WorldRegions>> =
            self.worlds.iter().map(|w| Arc::clone(w.value())).collect();
        worlds.sort_by(|a, b| a.world().cmp(b.world()));
        worlds
    }
}
