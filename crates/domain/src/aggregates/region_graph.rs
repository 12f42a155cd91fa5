//! RegionGraph aggregate - every region of one world
//!
//! The graph is the sole owner of its regions. It keeps three invariants:
//!
//! - ids are unique ignoring case
//! - the parent relation is a forest (no cycles, no dangling parents)
//! - the spatial index holds exactly the bounds of the cuboid regions
//!
//! Regions are reachable mutably only through [`RegionGraph::get_mut`], which
//! cannot change geometry or parents. Geometry changes go through
//! [`RegionGraph::insert_or_replace`], parents through
//! [`RegionGraph::set_parent`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::DomainError;
use crate::ids::{RegionId, GLOBAL_REGION_ID};
use crate::spatial::{LinearIndex, SpatialIndex};
use crate::value_objects::{Actor, BlockVector, Cuboid, Role};

use super::region::Region;

/// What [`RegionGraph::load`] had to fix in the incoming data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Regions whose parent reference was cleared, with the dropped parent.
    pub repaired_parents: Vec<(RegionId, RegionId)>,
    /// Ids that appeared more than once; the first occurrence was kept.
    pub duplicates: Vec<RegionId>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.repaired_parents.is_empty() && self.duplicates.is_empty()
    }
}

/// Per-world region container.
pub struct RegionGraph {
    regions: HashMap<String, Region>,
    index: Box<dyn SpatialIndex>,
}

impl fmt::Debug for RegionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionGraph")
            .field("regions", &self.regions.len())
            .field("index", &self.index)
            .finish()
    }
}

impl Default for RegionGraph {
    fn default() -> Self {
        Self::new(Box::new(LinearIndex::new()))
    }
}

fn sort_by_priority(regions: &mut [&Region]) {
    regions.sort_by(|a, b| b.priority().cmp(&a.priority()).then_with(|| a.id().cmp(b.id())));
}

impl RegionGraph {
    pub fn new(index: Box<dyn SpatialIndex>) -> Self {
        Self {
            regions: HashMap::new(),
            index,
        }
    }

    /// Build a graph from stored regions, repairing what would break the
    /// invariants instead of failing.
    pub fn load(regions: Vec<Region>, index: Box<dyn SpatialIndex>) -> (Self, LoadReport) {
        let mut graph = Self::new(index);
        let mut report = LoadReport::default();

        for region in regions {
            let key = region.id().key();
            if graph.regions.contains_key(&key) {
                report.duplicates.push(region.id().clone());
                continue;
            }
            if let Some(bounds) = region.bounds() {
                graph.index.insert(&key, *bounds);
            }
            graph.regions.insert(key, region);
        }

        let mut keys: Vec<String> = graph.regions.keys().cloned().collect();
        keys.sort();

        // Dangling parents first, so the cycle walk below only follows real links.
        for key in &keys {
            let dangling = graph.regions[key]
                .parent()
                .filter(|p| !graph.regions.contains_key(&p.key()))
                .cloned();
            if let Some(parent) = dangling {
                graph.clear_parent(key, parent, &mut report);
            }
        }

        for key in &keys {
            if graph.in_cycle(key) {
                if let Some(parent) = graph.regions[key].parent().cloned() {
                    graph.clear_parent(key, parent, &mut report);
                }
            }
        }

        (graph, report)
    }

    fn clear_parent(&mut self, key: &str, parent: RegionId, report: &mut LoadReport) {
        if let Some(region) = self.regions.get_mut(key) {
            region.set_parent_unchecked(None);
            report.repaired_parents.push((region.id().clone(), parent));
        }
    }

    fn in_cycle(&self, key: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = self.regions.get(key).and_then(Region::parent);
        while let Some(parent) = current {
            let parent_key = parent.key();
            if parent_key == key {
                return true;
            }
            if !seen.insert(parent_key.clone()) {
                // A loop further up the chain; it is repaired from its own members.
                return false;
            }
            current = self.regions.get(&parent_key).and_then(Region::parent);
        }
        false
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Case-insensitive exact match.
    pub fn lookup_exact(&self, id: &str) -> Option<&Region> {
        self.regions.get(&id.to_ascii_lowercase())
    }

    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.get(&id.key())
    }

    /// Mutable access for membership, priority and flag changes.
    pub fn get_mut(&mut self, id: &RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&id.key())
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.regions.contains_key(&id.key())
    }

    pub fn global(&self) -> Option<&Region> {
        self.regions.get(GLOBAL_REGION_ID)
    }

    /// The global region, created empty on first use.
    pub fn global_mut(&mut self) -> &mut Region {
        self.regions
            .entry(GLOBAL_REGION_ID.to_string())
            .or_insert_with(Region::global)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// All regions ordered by id, for persistence and display.
    pub fn snapshot(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = self.regions.values().cloned().collect();
        regions.sort_by(|a, b| a.id().cmp(b.id()));
        regions
    }

    pub fn children_of(&self, id: &RegionId) -> Vec<&Region> {
        let mut children: Vec<&Region> = self
            .regions
            .values()
            .filter(|r| r.parent() == Some(id))
            .collect();
        children.sort_by(|a, b| a.id().cmp(b.id()));
        children
    }

    // =========================================================================
    // Spatial queries
    // =========================================================================

    /// Cuboid regions touching or overlapping `volume`, highest priority first.
    /// The global region is never included.
    pub fn query_intersecting(&self, volume: &Cuboid) -> Vec<&Region> {
        let mut hits: Vec<&Region> = self
            .index
            .intersecting(volume)
            .iter()
            .filter_map(|key| self.regions.get(key))
            .collect();
        sort_by_priority(&mut hits);
        hits
    }

    /// Cuboid regions containing `point`, highest priority first.
    pub fn query_point(&self, point: BlockVector) -> Vec<&Region> {
        let mut hits: Vec<&Region> = self
            .index
            .containing(point)
            .iter()
            .filter_map(|key| self.regions.get(key))
            .collect();
        sort_by_priority(&mut hits);
        hits
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Number of non-global regions listing the actor (or one of its groups)
    /// among their direct owners.
    pub fn count_owned_by(&self, actor: &Actor) -> usize {
        self.regions
            .values()
            .filter(|r| !r.is_global() && r.owners().contains(actor))
            .count()
    }

    /// Parents of `region`, nearest first.
    pub fn ancestors<'a>(&'a self, region: &'a Region) -> Ancestors<'a> {
        Ancestors {
            graph: self,
            next: region.parent(),
            remaining: self.regions.len(),
        }
    }

    /// The region followed by its ancestors.
    pub fn lineage<'a>(&'a self, region: &'a Region) -> impl Iterator<Item = &'a Region> {
        std::iter::once(region).chain(self.ancestors(region))
    }

    /// Role of the actor on a region, inherited from ancestors. An owner of
    /// any ancestor owns the region; a member of any ancestor is a member.
    pub fn role_of(&self, region: &Region, actor: &Actor) -> Role {
        let mut role = Role::Neither;
        for r in self.lineage(region) {
            match r.role_of(actor) {
                Role::Owner => return Role::Owner,
                Role::Member => role = Role::Member,
                Role::Neither => {}
            }
        }
        role
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Upsert by id. This is a full replace: the caller carries forward
    /// anything it wants to keep from the previous version.
    ///
    /// Returns the replaced region, if any.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if the parent does not exist
    /// - `DomainError::Cycle` if the parent is the region itself or a descendant
    pub fn insert_or_replace(&mut self, region: Region) -> Result<Option<Region>, DomainError> {
        if let Some(parent) = region.parent() {
            if !self.contains(parent) {
                return Err(DomainError::not_found("Region", parent.as_str()));
            }
            if self.would_cycle(region.id(), parent) {
                return Err(DomainError::cycle(region.id().as_str(), parent.as_str()));
            }
        }

        let key = region.id().key();
        match region.bounds() {
            Some(bounds) => self.index.insert(&key, *bounds),
            None => self.index.remove(&key),
        }
        Ok(self.regions.insert(key, region))
    }

    /// Unconditional delete. Children keep existing and lose their parent.
    pub fn remove(&mut self, id: &RegionId) -> bool {
        let key = id.key();
        if self.regions.remove(&key).is_none() {
            return false;
        }
        self.index.remove(&key);
        for region in self.regions.values_mut() {
            if region.parent() == Some(id) {
                region.set_parent_unchecked(None);
            }
        }
        true
    }

    /// Whether making `parent` the parent of `child` would close a loop.
    pub fn would_cycle(&self, child: &RegionId, parent: &RegionId) -> bool {
        if child == parent {
            return true;
        }
        match self.get(parent) {
            Some(p) => self.lineage(p).any(|r| r.id() == child),
            None => false,
        }
    }

    /// Atomic check-then-set of a parent link. On error nothing changes.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if either region does not exist
    /// - `DomainError::Cycle` if the parent's ancestor chain contains the child
    pub fn set_parent(
        &mut self,
        child: &RegionId,
        parent: Option<&RegionId>,
    ) -> Result<(), DomainError> {
        if !self.contains(child) {
            return Err(DomainError::not_found("Region", child.as_str()));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(DomainError::not_found("Region", parent.as_str()));
            }
            if self.would_cycle(child, parent) {
                return Err(DomainError::cycle(child.as_str(), parent.as_str()));
            }
        }
        let parent = parent.and_then(|p| self.get(p)).map(|p| p.id().clone());
        if let Some(region) = self.get_mut(child) {
            region.set_parent_unchecked(parent);
        }
        Ok(())
    }
}

/// Iterator over a region's ancestors.
///
/// Bounded by the number of regions in the graph so a corrupted chain can
/// never loop forever.
pub struct Ancestors<'a> {
    graph: &'a RegionGraph,
    next: Option<&'a RegionId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Region;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let region = self.graph.get(self.next?)?;
        self.next = region.parent();
        Some(region)
    }
}
