//! Admission rule for claims that touch other regions
//!
//! A candidate volume is admitted when the actor owns every region it
//! intersects, and every region within the border distance of it.
//! Ownership is inherited, so an owner of a parent also owns its children. The
//! direct-overlap check always runs first, so a true overlap is never
//! reported as a proximity problem.

use crate::aggregates::{Region, RegionGraph};
use crate::ids::RegionId;
use crate::value_objects::{Actor, ClaimPolicy, Cuboid, Role};

/// Why a candidate volume was refused, with the ids owned by someone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimConflict {
    Overlap(Vec<RegionId>),
    Proximity(Vec<RegionId>),
}

impl ClaimConflict {
    pub fn region_ids(&self) -> &[RegionId] {
        match self {
            ClaimConflict::Overlap(ids) | ClaimConflict::Proximity(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapPolicy {
    ignore_negative_priority: bool,
}

impl OverlapPolicy {
    pub fn new(ignore_negative_priority: bool) -> Self {
        Self {
            ignore_negative_priority,
        }
    }

    pub fn from_policy(policy: &ClaimPolicy) -> Self {
        Self::new(policy.ignore_negative_priority)
    }

    /// Decide over precomputed region sets.
    ///
    /// `primary` intersects the candidate, `border` intersects the candidate
    /// grown by the border distance. Regions sharing the candidate's id are
    /// its own previous geometry and never conflict. `graph` answers
    /// inherited ownership.
    pub fn check<'a>(
        &self,
        graph: &RegionGraph,
        candidate: &RegionId,
        actor: &Actor,
        primary: impl IntoIterator<Item = &'a Region>,
        border: impl IntoIterator<Item = &'a Region>,
    ) -> Result<(), ClaimConflict> {
        let foreign = self.foreign(graph, candidate, actor, primary);
        if !foreign.is_empty() {
            return Err(ClaimConflict::Overlap(foreign));
        }
        let foreign = self.foreign(graph, candidate, actor, border);
        if !foreign.is_empty() {
            return Err(ClaimConflict::Proximity(foreign));
        }
        Ok(())
    }

    /// Query `graph` for both sets and decide.
    pub fn evaluate(
        &self,
        graph: &RegionGraph,
        candidate: &RegionId,
        volume: &Cuboid,
        border_distance: i32,
        actor: &Actor,
    ) -> Result<(), ClaimConflict> {
        let primary = graph.query_intersecting(volume);
        let border = graph.query_intersecting(&volume.expand_border(border_distance));
        self.check(graph, candidate, actor, primary, border)
    }

    fn foreign<'a>(
        &self,
        graph: &RegionGraph,
        candidate: &RegionId,
        actor: &Actor,
        regions: impl IntoIterator<Item = &'a Region>,
    ) -> Vec<RegionId> {
        regions
            .into_iter()
            .filter(|r| r.id() != candidate)
            .filter(|r| !(self.ignore_negative_priority && r.priority() < 0))
            .filter(|r| graph.role_of(r, actor) != Role::Owner)
            .map(|r| r.id().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::ClaimType;
    use crate::ids::PlayerName;
    use crate::value_objects::BlockVector;

    fn cuboid(a: (i32, i32, i32), b: (i32, i32, i32)) -> Cuboid {
        Cuboid::normalize(BlockVector::new(a.0, a.1, a.2), BlockVector::new(b.0, b.1, b.2))
    }

    fn actor(name: &str) -> Actor {
        Actor::new(PlayerName::new(name).unwrap())
    }

    fn id(s: &str) -> RegionId {
        RegionId::parse(s).unwrap()
    }

    /// "alpha" owned by p at (0,0,0)-(10,10,10).
    fn world() -> RegionGraph {
        let mut graph = RegionGraph::default();
        let mut alpha = Region::cuboid(id("alpha"), cuboid((0, 0, 0), (10, 10, 10)), ClaimType::Land);
        alpha.owners_mut().add_player(PlayerName::new("p").unwrap());
        graph.insert_or_replace(alpha).unwrap();
        graph
    }

    #[test]
    fn test_near_miss_is_proximity_conflict() {
        let graph = world();
        let result = OverlapPolicy::new(true).evaluate(
            &graph,
            &id("q1"),
            &cuboid((11, 0, 0), (20, 10, 10)),
            5,
            &actor("q"),
        );
        assert_eq!(result, Err(ClaimConflict::Proximity(vec![id("alpha")])));
    }

    #[test]
    fn test_true_overlap_is_overlap_conflict() {
        let graph = world();
        let result = OverlapPolicy::new(true).evaluate(
            &graph,
            &id("q1"),
            &cuboid((5, 0, 0), (15, 10, 10)),
            5,
            &actor("q"),
        );
        assert_eq!(result, Err(ClaimConflict::Overlap(vec![id("alpha")])));
    }

    #[test]
    fn test_far_away_is_admitted() {
        let graph = world();
        let result = OverlapPolicy::new(true).evaluate(
            &graph,
            &id("q1"),
            &cuboid((16, 0, 0), (30, 10, 10)),
            5,
            &actor("q"),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_own_regions_never_conflict() {
        let graph = world();
        let result = OverlapPolicy::new(true).evaluate(
            &graph,
            &id("alpha2"),
            &cuboid((5, 0, 0), (15, 10, 10)),
            5,
            &actor("p"),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_own_previous_geometry_is_skipped() {
        let graph = world();
        let result = OverlapPolicy::new(true).evaluate(
            &graph,
            &id("ALPHA"),
            &cuboid((0, 0, 0), (15, 10, 15)),
            5,
            &actor("admin"),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_negative_priority_ignored_only_when_configured() {
        let mut graph = RegionGraph::default();
        let zone = Region::cuboid(id("spawn"), cuboid((0, 0, 0), (100, 255, 100)), ClaimType::Region)
            .with_priority(-1);
        graph.insert_or_replace(zone).unwrap();
        let volume = cuboid((10, 0, 10), (20, 255, 20));

        assert_eq!(
            OverlapPolicy::new(true).evaluate(&graph, &id("home"), &volume, 5, &actor("q")),
            Ok(())
        );
        assert_eq!(
            OverlapPolicy::new(false).evaluate(&graph, &id("home"), &volume, 5, &actor("q")),
            Err(ClaimConflict::Overlap(vec![id("spawn")]))
        );
    }

    #[test]
    fn test_reports_only_foreign_ids() {
        let mut graph = world();
        let mut mine = Region::cuboid(id("mine"), cuboid((12, 0, 0), (14, 10, 10)), ClaimType::Land);
        mine.owners_mut().add_player(PlayerName::new("q").unwrap());
        graph.insert_or_replace(mine).unwrap();

        let err = OverlapPolicy::new(true)
            .evaluate(&graph, &id("q2"), &cuboid((11, 0, 0), (20, 10, 10)), 5, &actor("q"))
            .unwrap_err();
        assert_eq!(err.region_ids(), &[id("alpha")]);
    }

    #[test]
    fn test_owner_of_parent_may_touch_child() {
        let mut graph = RegionGraph::default();
        let mut estate = Region::cuboid(id("estate"), cuboid((0, 0, 0), (100, 50, 100)), ClaimType::Land);
        estate.owners_mut().add_player(PlayerName::new("p").unwrap());
        graph.insert_or_replace(estate).unwrap();
        let plot = Region::cuboid(id("plot"), cuboid((10, 0, 10), (20, 50, 20)), ClaimType::Land)
            .with_parent(Some(id("estate")));
        graph.insert_or_replace(plot).unwrap();
        let home = cuboid((15, 0, 15), (30, 50, 30));

        assert_eq!(
            OverlapPolicy::new(true).evaluate(&graph, &id("home"), &home, 5, &actor("p")),
            Ok(())
        );
        let err = OverlapPolicy::new(true)
            .evaluate(&graph, &id("home"), &home, 5, &actor("q"))
            .unwrap_err();
        assert!(matches!(err, ClaimConflict::Overlap(_)));
        assert!(err.region_ids().contains(&id("plot")));
    }
}
