//! Claimward domain model
//!
//! Pure, synchronous types for land claims: identifiers, claim geometry,
//! membership domains, flags, regions and the per-world region graph, plus
//! the admission rules that decide whether a claim may be placed.
//!
//! Nothing here performs I/O or locking. The engine crate wraps a
//! [`RegionGraph`] per world in a lock and drives it from its use cases.

extern crate self as claimward_domain;

pub mod aggregates;
pub mod error;
pub mod flags;
pub mod ids;
pub mod overlap;
pub mod spatial;
pub mod value_objects;

pub use aggregates::{Ancestors, ClaimType, LoadReport, Region, RegionGraph};
pub use error::DomainError;
pub use flags::{
    normalize_flag_name, FlagDef, FlagKind, FlagRegistry, FlagResolver, FlagValue, ParseContext,
    RegionGroup, SetElement, StateValue,
};
pub use ids::{GroupName, PlayerName, RegionId, WorldName, GLOBAL_REGION_ID};
pub use overlap::{ClaimConflict, OverlapPolicy};
pub use spatial::{LinearIndex, SpatialIndex};
pub use value_objects::{
    Actor, AreaLimitMode, BlockVector, ClaimPolicy, Cuboid, Domain, DomainEntry, RegionShape, Role,
};
