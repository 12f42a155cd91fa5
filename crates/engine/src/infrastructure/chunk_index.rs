//! Chunk-grid spatial index.
//!
//! Cuboids are bucketed by the 16x16 horizontal chunks they cover. Cuboids
//! spanning more than [`MAX_CHUNKS_PER_ENTRY`] chunks go to an overflow list
//! that every query scans, so one huge administrative zone does not fill
//! thousands of buckets.

use std::collections::{BTreeSet, HashMap};

use claimward_domain::{BlockVector, Cuboid, SpatialIndex};

const CHUNK_SHIFT: u32 = 4;
const MAX_CHUNKS_PER_ENTRY: i64 = 1024;

type ChunkPos = (i32, i32);

#[derive(Debug, Clone, Copy)]
struct ChunkSpan {
    min: ChunkPos,
    max: ChunkPos,
}

impl ChunkSpan {
    fn of(bounds: &Cuboid) -> Self {
        let (min, max) = (bounds.min(), bounds.max());
        Self {
            min: (min.x >> CHUNK_SHIFT, min.z >> CHUNK_SHIFT),
            max: (max.x >> CHUNK_SHIFT, max.z >> CHUNK_SHIFT),
        }
    }

    fn count(&self) -> i64 {
        (i64::from(self.max.0) - i64::from(self.min.0) + 1)
            * (i64::from(self.max.1) - i64::from(self.min.1) + 1)
    }

    fn chunks(self) -> impl Iterator<Item = ChunkPos> {
        (self.min.0..=self.max.0).flat_map(move |cx| (self.min.1..=self.max.1).map(move |cz| (cx, cz)))
    }
}

/// [`SpatialIndex`] bucketing cuboids into horizontal chunks.
#[derive(Debug, Default)]
pub struct ChunkGridIndex {
    bounds: HashMap<String, Cuboid>,
    chunks: HashMap<ChunkPos, BTreeSet<String>>,
    overflow: BTreeSet<String>,
}

impl ChunkGridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn unlink(&mut self, key: &str, bounds: &Cuboid) {
        if self.overflow.remove(key) {
            return;
        }
        for chunk in ChunkSpan::of(bounds).chunks() {
            if let Some(bucket) = self.chunks.get_mut(&chunk) {
                bucket.remove(key);
                if bucket.is_empty() {
                    self.chunks.remove(&chunk);
                }
            }
        }
    }

    fn candidates(&self, span: ChunkSpan) -> BTreeSet<&String> {
        if span.count() > MAX_CHUNKS_PER_ENTRY {
            return self.bounds.keys().collect();
        }
        span.chunks()
            .filter_map(|c| self.chunks.get(&c))
            .flatten()
            .chain(self.overflow.iter())
            .collect()
    }
}

impl SpatialIndex for ChunkGridIndex {
    fn insert(&mut self, key: &str, bounds: Cuboid) {
        if let Some(old) = self.bounds.remove(key) {
            self.unlink(key, &old);
        }
        let span = ChunkSpan::of(&bounds);
        if span.count() > MAX_CHUNKS_PER_ENTRY {
            self.overflow.insert(key.to_string());
        } else {
            for chunk in span.chunks() {
                self.chunks.entry(chunk).or_default().insert(key.to_string());
            }
        }
        self.bounds.insert(key.to_string(), bounds);
    }

    fn remove(&mut self, key: &str) {
        if let Some(old) = self.bounds.remove(key) {
            self.unlink(key, &old);
        }
    }

    fn intersecting(&self, volume: &Cuboid) -> Vec<String> {
        self.candidates(ChunkSpan::of(volume))
            .into_iter()
            .filter(|key| self.bounds.get(*key).is_some_and(|b| b.intersects(volume)))
            .cloned()
            .collect()
    }

    fn containing(&self, point: BlockVector) -> Vec<String> {
        let chunk = (point.x >> CHUNK_SHIFT, point.z >> CHUNK_SHIFT);
        self.chunks
            .get(&chunk)
            .into_iter()
            .flatten()
            .chain(self.overflow.iter())
            .filter(|key| self.bounds.get(*key).is_some_and(|b| b.contains(point)))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.bounds.len()
    }
}
