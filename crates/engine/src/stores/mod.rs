//! In-memory state storage modules.
//!
//! - `WorldRegistry` - lazily loaded per-world region state
//! - `WorldRegions` - one world's region graph behind its lock

pub mod world_regions;

pub use world_regions::{IndexFactory, Snapshot, WorldRegions, WorldRegistry};
