//! Aggregate roots - domain objects that own their related data
//!
//! | Aggregate | Owns | Invariants |
//! |-----------|------|------------|
//! | [`Region`] | geometry, owners, members, flags | min <= max, unset flags are absent |
//! | [`RegionGraph`] | every region of one world | unique ids, acyclic parents, index in sync |

mod region;
mod region_graph;

pub use region::{ClaimType, Region};
pub use region_graph::{Ancestors, LoadReport, RegionGraph};
