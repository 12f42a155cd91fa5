//! Region aggregate - a claim or administrative zone in one world
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: geometry can only change by building a new region
//!   (see [`Region::resized`]) and handing it to the graph
//! - **Parent by id**: the parent is a weak reference resolved through
//!   [`RegionGraph`](super::RegionGraph), which owns every region
//! - **Unset flags are absent**: a missing map entry means "inherit"

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flags::FlagValue;
use crate::ids::RegionId;
use crate::value_objects::{Actor, BlockVector, Cuboid, Domain, RegionShape, Role};

/// Classification scoping which workflows may operate on a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    /// Created through the claim workflow
    Land,
    /// Administrative zone
    #[default]
    Region,
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimType::Land => write!(f, "land"),
            ClaimType::Region => write!(f, "region"),
        }
    }
}

/// A named spatial volume with ownership, flags and an optional parent.
///
/// # Example
///
/// ```
/// use claimward_domain::{ClaimType, Region, RegionId};
/// use claimward_domain::value_objects::{BlockVector, Cuboid};
///
/// let bounds = Cuboid::normalize(BlockVector::new(0, 0, 0), BlockVector::new(10, 10, 10));
/// let region = Region::cuboid(RegionId::claim("alpha").unwrap(), bounds, ClaimType::Land);
///
/// assert_eq!(region.priority(), 0);
/// assert!(region.owners().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    id: RegionId,
    shape: RegionShape,
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    owners: Domain,
    #[serde(default)]
    members: Domain,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    flags: BTreeMap<String, FlagValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<RegionId>,
    #[serde(default)]
    claim_type: ClaimType,
}

impl Region {
    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn cuboid(id: RegionId, bounds: Cuboid, claim_type: ClaimType) -> Self {
        Self {
            id,
            shape: RegionShape::cuboid(bounds),
            priority: 0,
            owners: Domain::new(),
            members: Domain::new(),
            flags: BTreeMap::new(),
            parent: None,
            claim_type,
        }
    }

    /// The implicit whole-world region.
    pub fn global() -> Self {
        Self {
            id: RegionId::global(),
            shape: RegionShape::Global,
            priority: 0,
            owners: Domain::new(),
            members: Domain::new(),
            flags: BTreeMap::new(),
            parent: None,
            claim_type: ClaimType::Region,
        }
    }

    /// A copy with new bounds, carrying forward owners, members, flags,
    /// priority, claim type and parent.
    pub fn resized(&self, bounds: Cuboid) -> Self {
        Self {
            shape: RegionShape::cuboid(bounds),
            ..self.clone()
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Parent validity is checked when the region is inserted into a graph.
    pub fn with_parent(mut self, parent: Option<RegionId>) -> Self {
        self.parent = parent;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &RegionId {
        &self.id
    }

    #[inline]
    pub fn shape(&self) -> &RegionShape {
        &self.shape
    }

    pub fn bounds(&self) -> Option<&Cuboid> {
        self.shape.bounds()
    }

    pub fn is_global(&self) -> bool {
        matches!(self.shape, RegionShape::Global)
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn owners(&self) -> &Domain {
        &self.owners
    }

    pub fn members(&self) -> &Domain {
        &self.members
    }

    pub fn flags(&self) -> &BTreeMap<String, FlagValue> {
        &self.flags
    }

    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    pub fn parent(&self) -> Option<&RegionId> {
        self.parent.as_ref()
    }

    pub fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    pub fn contains(&self, point: BlockVector) -> bool {
        self.shape.contains(point)
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Direct ownership; parent owners are resolved by the graph.
    pub fn is_owner(&self, actor: &Actor) -> bool {
        self.owners.contains(actor)
    }

    /// Owners imply membership.
    pub fn is_member(&self, actor: &Actor) -> bool {
        self.is_owner(actor) || self.members.contains(actor)
    }

    pub fn role_of(&self, actor: &Actor) -> Role {
        if self.is_owner(actor) {
            Role::Owner
        } else if self.members.contains(actor) {
            Role::Member
        } else {
            Role::Neither
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn owners_mut(&mut self) -> &mut Domain {
        &mut self.owners
    }

    pub fn members_mut(&mut self) -> &mut Domain {
        &mut self.members
    }

    /// Store a value under `name`, or clear it with `None`.
    pub(crate) fn put_flag(&mut self, name: &str, value: Option<FlagValue>) {
        match value {
            Some(v) => {
                self.flags.insert(name.to_string(), v);
            }
            None => {
                self.flags.remove(name);
            }
        }
    }

    pub(crate) fn set_parent_unchecked(&mut self, parent: Option<RegionId>) {
        self.parent = parent;
    }
}
