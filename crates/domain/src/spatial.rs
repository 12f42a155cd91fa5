//! Range-query seam between [`RegionGraph`](crate::RegionGraph) and an index
//!
//! The graph keeps the index in sync with its regions and only ever asks it
//! for candidate keys. Implementations must use closed-interval semantics:
//! a box touching a query volume at a face, edge or corner is a hit.

use std::collections::BTreeMap;
use std::fmt;

use crate::value_objects::{BlockVector, Cuboid};

/// Spatial index over region bounds, keyed by lowercase region id.
pub trait SpatialIndex: Send + Sync + fmt::Debug {
    /// Insert or replace the bounds stored under `key`.
    fn insert(&mut self, key: &str, bounds: Cuboid);

    fn remove(&mut self, key: &str);

    /// Keys whose bounds intersect `volume`, in no particular order.
    fn intersecting(&self, volume: &Cuboid) -> Vec<String>;

    /// Keys whose bounds contain `point`, in no particular order.
    fn containing(&self, point: BlockVector) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Brute-force index. Every query scans all entries.
#[derive(Debug, Clone, Default)]
pub struct LinearIndex {
    entries: BTreeMap<String, Cuboid>,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialIndex for LinearIndex {
    fn insert(&mut self, key: &str, bounds: Cuboid) {
        self.entries.insert(key.to_string(), bounds);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn intersecting(&self, volume: &Cuboid) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, bounds)| bounds.intersects(volume))
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn containing(&self, point: BlockVector) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, bounds)| bounds.contains(point))
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
