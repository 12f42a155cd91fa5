//! Change claim use case.
//!
//! Gives an existing claim new bounds. Everything else about the claim is
//! carried forward unchanged.

use std::sync::Arc;

use claimward_domain::{Cuboid, Region, RegionId, WorldName};

use super::access::{Caller, ClaimAction};
use super::context::ClaimContext;
use super::error::{ClaimError, Committed};

pub struct ChangeClaim {
    ctx: Arc<ClaimContext>,
}

impl ChangeClaim {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// Resize `id` to `selection`, stretched to the claimable height range.
    ///
    /// The quota is not consulted since no claim is added. The region's own
    /// previous bounds never count as a conflict.
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        id: &str,
        selection: Cuboid,
    ) -> Result<Committed<Region>, ClaimError> {
        caller.require_player()?;
        let id = RegionId::parse(id)?;
        if id.is_global() {
            return Err(ClaimError::ReservedIdentifier(id.to_string()));
        }

        let policy = self.ctx.policy(world);
        let volume = policy.claim_volume(&selection);
        let regions = self.ctx.world(world).await?;

        let mut graph = regions.write().await;
        let existing = graph
            .get(&id)
            .ok_or_else(|| ClaimError::NotFound { id: id.to_string() })?;
        self.ctx
            .access()
            .require_tiered(caller, &graph, existing, ClaimAction::Change)?;

        let mut warnings = self
            .ctx
            .check_placement(&graph, policy, caller, existing.id(), &volume)?;

        let region = existing.resized(volume);
        graph.insert_or_replace(region.clone())?;
        let snapshot = regions.snapshot(&graph);
        drop(graph);

        tracing::info!(
            world = %world,
            region = %region.id(),
            player = %caller,
            bounds = %volume,
            "Claim changed"
        );

        self.ctx.save(&regions, snapshot, &mut warnings).await;
        Ok(Committed::new(region, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::claims::test_support::{cuboid, player, world, Fixture};
    use claimward_domain::{ClaimType, FlagValue, PlayerName, StateValue};

    /// "alpha" owned by p at (0,0,0)-(10,10,10) with a member, a flag,
    /// a priority and a parent.
    async fn setup() -> (Fixture, ChangeClaim) {
        let fixture = Fixture::new();
        let use_cases = fixture.use_cases();
        use_cases
            .define
            .execute(&player("p"), &world(), "root", cuboid((500, 0, 500), (510, 10, 510)), ClaimType::Land)
            .await
            .unwrap();
        use_cases
            .define
            .execute(&player("p"), &world(), "alpha", cuboid((0, 0, 0), (10, 10, 10)), ClaimType::Land)
            .await
            .unwrap();
        {
            let regions = fixture.ctx.world(&world()).await.unwrap();
            let mut graph = regions.write().await;
            let alpha_id = RegionId::parse("alpha").unwrap();
            graph
                .set_parent(&alpha_id, Some(&RegionId::parse("root").unwrap()))
                .unwrap();
            let resolver = fixture.ctx.resolver();
            let alpha = graph.get_mut(&alpha_id).unwrap();
            alpha.set_priority(3);
            alpha.members_mut().add_player(PlayerName::new("m").unwrap());
            resolver
                .set_flag(
                    alpha,
                    resolver.lookup("pvp").unwrap(),
                    Some(FlagValue::State(StateValue::Deny)),
                )
                .unwrap();
        }
        let change = ChangeClaim::new(fixture.ctx.clone());
        (fixture, change)
    }

    #[tokio::test]
    async fn when_owner_resizes_then_everything_but_bounds_is_carried_over() {
        let (fixture, change) = setup().await;
        let before = {
            let regions = fixture.ctx.world(&world()).await.unwrap();
            let graph = regions.read().await;
            graph.lookup_exact("alpha").unwrap().clone()
        };

        let committed = change
            .execute(&player("p"), &world(), "Alpha", cuboid((0, 0, 0), (15, 10, 15)))
            .await
            .unwrap();

        let after = committed.value;
        assert_eq!(after.bounds().unwrap().max().x, 15);
        assert_eq!(after.bounds().unwrap().max().z, 15);
        assert_eq!(after.owners(), before.owners());
        assert_eq!(after.members(), before.members());
        assert_eq!(after.flags(), before.flags());
        assert_eq!(after.priority(), 3);
        assert_eq!(after.parent(), before.parent());
        assert_eq!(after.claim_type(), before.claim_type());
        assert_eq!(after.id().as_str(), "alpha");
    }

    #[tokio::test]
    async fn when_resize_reaches_foreign_claim_then_rejected_and_unchanged() {
        let (fixture, change) = setup().await;
        fixture
            .use_cases()
            .define
            .execute(&player("q"), &world(), "qhome", cuboid((30, 0, 0), (40, 10, 10)), ClaimType::Land)
            .await
            .unwrap();

        let result = change
            .execute(&player("p"), &world(), "alpha", cuboid((0, 0, 0), (27, 10, 10)))
            .await;

        assert_eq!(
            result,
            Err(ClaimError::Proximity {
                conflicting: vec![RegionId::parse("qhome").unwrap()]
            })
        );
        let regions = fixture.ctx.world(&world()).await.unwrap();
        let graph = regions.read().await;
        assert_eq!(graph.lookup_exact("alpha").unwrap().bounds().unwrap().max().x, 10);
    }

    #[tokio::test]
    async fn when_not_owner_then_unauthorized() {
        let (_fixture, change) = setup().await;

        let result = change
            .execute(&player("q"), &world(), "alpha", cuboid((0, 0, 0), (5, 5, 5)))
            .await;

        assert_eq!(
            result,
            Err(ClaimError::Unauthorized {
                node: "claimward.claim.change.alpha".to_string()
            })
        );
    }

    #[tokio::test]
    async fn when_region_missing_or_global_then_rejected() {
        let (_fixture, change) = setup().await;

        let missing = change
            .execute(&player("p"), &world(), "nowhere", cuboid((0, 0, 0), (5, 5, 5)))
            .await;
        let global = change
            .execute(&player("p"), &world(), "__global__", cuboid((0, 0, 0), (5, 5, 5)))
            .await;

        assert_eq!(missing, Err(ClaimError::NotFound { id: "nowhere".to_string() }));
        assert!(matches!(global, Err(ClaimError::ReservedIdentifier(_))));
    }
}
