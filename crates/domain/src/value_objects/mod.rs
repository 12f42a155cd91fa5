//! Value objects - Immutable objects defined by their attributes

mod claim_policy;
mod geometry;
mod membership;

pub use claim_policy::{AreaLimitMode, ClaimPolicy};
pub use geometry::{BlockVector, Cuboid, RegionShape};
pub use membership::{Actor, Domain, DomainEntry, Role, GROUP_PREFIX};
