//! Define claim use case.
//!
//! Creates a new claim from a selected volume, owned by the caller.

use std::sync::Arc;

use claimward_domain::{ClaimType, Cuboid, Region, RegionId, WorldName};

use super::access::{Caller, DEFINE_NODE};
use super::context::ClaimContext;
use super::error::{ClaimError, Committed};

/// Define claim use case.
///
/// Orchestrates: id validation, duplicate check, vertical expansion, quota,
/// overlap and proximity checks, area limit, default flags, commit, save.
pub struct DefineClaim {
    ctx: Arc<ClaimContext>,
}

impl DefineClaim {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// Execute the define claim use case.
    ///
    /// # Arguments
    /// * `caller` - The player claiming; becomes the sole owner
    /// * `world` - World the claim lives in
    /// * `id` - Requested region id
    /// * `selection` - Selected volume, stretched to the claimable height range
    /// * `claim_type` - Which default flag preset applies
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        id: &str,
        selection: Cuboid,
        claim_type: ClaimType,
    ) -> Result<Committed<Region>, ClaimError> {
        let actor = caller.require_player()?;
        self.ctx.access().require(caller, DEFINE_NODE)?;
        let id = RegionId::claim(id)?;

        let policy = self.ctx.policy(world);
        let volume = policy.claim_volume(&selection);
        let regions = self.ctx.world(world).await?;

        let mut graph = regions.write().await;
        if let Some(existing) = graph.get(&id) {
            return Err(ClaimError::DuplicateId(existing.id().to_string()));
        }

        if !self.ctx.access().is_unlimited(caller) {
            let owned = graph.count_owned_by(actor);
            if policy.quota_reached(owned) {
                return Err(ClaimError::QuotaExceeded {
                    limit: policy.max_region_count,
                    owned,
                });
            }
        }

        let mut warnings = self
            .ctx
            .check_placement(&graph, policy, caller, &id, &volume)?;

        let mut region = Region::cuboid(id, volume, claim_type);
        region.owners_mut().add_player(actor.name().clone());
        let resolver = self.ctx.resolver();
        for (def, value) in policy.default_flags_for(claim_type, resolver.registry())? {
            resolver.set_flag(&mut region, def, value)?;
        }

        graph.insert_or_replace(region.clone())?;
        let snapshot = regions.snapshot(&graph);
        drop(graph);

        tracing::info!(
            world = %world,
            region = %region.id(),
            owner = %actor.name(),
            bounds = %volume,
            "Claim defined"
        );

        self.ctx.save(&regions, snapshot, &mut warnings).await;
        Ok(Committed::new(region, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockRegionStore, RepoError};
    use crate::use_cases::claims::error::ClaimWarning;
    use crate::use_cases::claims::test_support::{
        admin, context, cuboid, no_positions, player, world, Fixture,
    };
    use claimward_domain::{AreaLimitMode, ClaimPolicy, FlagValue, PlayerName, StateValue};
    use std::collections::BTreeMap;

    async fn define(
        use_case: &DefineClaim,
        caller: &Caller,
        id: &str,
        a: (i32, i32, i32),
        b: (i32, i32, i32),
    ) -> Result<Committed<Region>, ClaimError> {
        use_case
            .execute(caller, &world(), id, cuboid(a, b), ClaimType::Land)
            .await
    }

    /// "alpha" owned by p at (0,0,0)-(10,10,10).
    async fn with_alpha(fixture: &Fixture) -> DefineClaim {
        let use_case = DefineClaim::new(fixture.ctx.clone());
        define(&use_case, &player("p"), "alpha", (0, 0, 0), (10, 10, 10))
            .await
            .unwrap();
        use_case
    }

    #[tokio::test]
    async fn when_space_is_free_then_claim_is_created_and_saved() {
        let fixture = Fixture::new();
        let use_case = DefineClaim::new(fixture.ctx.clone());

        let committed = define(&use_case, &player("p"), "Alpha", (0, 60, 0), (10, 70, 10))
            .await
            .unwrap();

        assert!(committed.warnings.is_empty());
        let region = committed.value;
        assert_eq!(region.id().as_str(), "Alpha");
        assert!(region.owners().contains_player(&PlayerName::new("p").unwrap()));
        let bounds = region.bounds().unwrap();
        assert_eq!((bounds.min().y, bounds.max().y), (0, 255));

        let regions = fixture.ctx.world(&world()).await.unwrap();
        assert!(regions.read().await.lookup_exact("alpha").is_some());
        assert_eq!(fixture.store.saved(&world()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn when_claim_comes_within_border_then_proximity_conflict() {
        let fixture = Fixture::new();
        let use_case = with_alpha(&fixture).await;

        let result = define(&use_case, &player("q"), "q1", (11, 0, 0), (20, 10, 10)).await;

        assert_eq!(
            result,
            Err(ClaimError::Proximity {
                conflicting: vec![RegionId::parse("alpha").unwrap()]
            })
        );
    }

    #[tokio::test]
    async fn when_claim_intersects_then_overlap_conflict() {
        let fixture = Fixture::new();
        let use_case = with_alpha(&fixture).await;

        let result = define(&use_case, &player("q"), "q1", (5, 0, 0), (15, 10, 10)).await;

        assert_eq!(
            result,
            Err(ClaimError::Overlap {
                conflicting: vec![RegionId::parse("alpha").unwrap()]
            })
        );
    }

    #[tokio::test]
    async fn when_owner_claims_next_to_own_region_then_admitted() {
        let fixture = Fixture::new();
        let use_case = with_alpha(&fixture).await;

        let result = define(&use_case, &player("p"), "alpha2", (5, 0, 0), (15, 10, 10)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn when_owner_of_parent_claims_over_child_then_admitted() {
        let fixture = Fixture::new();
        let use_case = DefineClaim::new(fixture.ctx.clone());
        define(&use_case, &player("p"), "estate", (0, 0, 0), (100, 10, 100))
            .await
            .unwrap();
        {
            let regions = fixture.ctx.world(&world()).await.unwrap();
            let mut graph = regions.write().await;
            let plot = Region::cuboid(
                RegionId::parse("plot").unwrap(),
                cuboid((10, 0, 10), (20, 10, 20)),
                ClaimType::Land,
            )
            .with_parent(Some(RegionId::parse("estate").unwrap()));
            graph.insert_or_replace(plot).unwrap();
        }

        let own = define(&use_case, &player("p"), "home", (15, 0, 15), (30, 10, 30)).await;
        let stranger = define(&use_case, &player("q"), "q1", (15, 0, 15), (30, 10, 30)).await;

        assert!(own.is_ok());
        assert!(matches!(
            stranger,
            Err(ClaimError::Overlap { conflicting }) if conflicting.contains(&RegionId::parse("plot").unwrap())
        ));
    }

    #[tokio::test]
    async fn when_id_exists_in_other_case_then_duplicate() {
        let fixture = Fixture::new();
        let use_case = with_alpha(&fixture).await;

        let result = define(&use_case, &player("p"), "ALPHA", (100, 0, 100), (110, 10, 110)).await;

        assert_eq!(result, Err(ClaimError::DuplicateId("alpha".to_string())));
    }

    #[tokio::test]
    async fn when_id_is_reserved_or_malformed_then_rejected() {
        let fixture = Fixture::new();
        let use_case = DefineClaim::new(fixture.ctx.clone());

        let reserved = define(&use_case, &player("p"), "__GLOBAL__", (0, 0, 0), (1, 1, 1)).await;
        let malformed = define(&use_case, &player("p"), "my claim", (0, 0, 0), (1, 1, 1)).await;

        assert!(matches!(reserved, Err(ClaimError::ReservedIdentifier(_))));
        assert!(matches!(malformed, Err(ClaimError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn when_quota_reached_then_rejected_unless_unlimited() {
        let fixture = Fixture::with_policy(ClaimPolicy {
            max_region_count: 1,
            ..ClaimPolicy::default()
        });
        let use_case = with_alpha(&fixture).await;

        let blocked = define(&use_case, &player("p"), "beta", (100, 0, 100), (110, 10, 110)).await;
        assert_eq!(blocked, Err(ClaimError::QuotaExceeded { limit: 1, owned: 1 }));

        let unlimited = define(&use_case, &admin("p"), "beta", (100, 0, 100), (110, 10, 110)).await;
        assert!(unlimited.is_ok());
    }

    #[tokio::test]
    async fn when_limit_is_negative_then_quota_never_blocks() {
        let fixture = Fixture::with_policy(ClaimPolicy {
            max_region_count: -1,
            ..ClaimPolicy::default()
        });
        let use_case = DefineClaim::new(fixture.ctx.clone());

        for i in 0..10 {
            let x = i * 100;
            define(&use_case, &player("p"), &format!("c{}", i), (x, 0, 0), (x + 5, 5, 5))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn when_area_exceeds_limit_then_warn_or_reject_per_policy() {
        let warn = Fixture::with_policy(ClaimPolicy {
            max_claim_area: 100,
            ..ClaimPolicy::default()
        });
        let committed = define(
            &DefineClaim::new(warn.ctx.clone()),
            &player("p"),
            "big",
            (0, 0, 0),
            (10, 0, 10),
        )
        .await
        .unwrap();
        assert_eq!(
            committed.warnings,
            vec![ClaimWarning::AreaExceedsLimit { max: 100, actual: 121 }]
        );

        let reject = Fixture::with_policy(ClaimPolicy {
            max_claim_area: 100,
            area_limit: AreaLimitMode::Reject,
            ..ClaimPolicy::default()
        });
        let result = define(
            &DefineClaim::new(reject.ctx.clone()),
            &player("p"),
            "big",
            (0, 0, 0),
            (10, 0, 10),
        )
        .await;
        assert_eq!(result, Err(ClaimError::AreaExceeded { max: 100, actual: 121 }));
    }

    #[tokio::test]
    async fn when_policy_has_default_flags_then_new_claim_gets_them() {
        let mut policy = ClaimPolicy::default();
        policy.default_flags.insert(
            ClaimType::Land,
            BTreeMap::from([("pvp".to_string(), "deny".to_string())]),
        );
        let fixture = Fixture::with_policy(policy);
        let use_case = DefineClaim::new(fixture.ctx.clone());

        let land = define(&use_case, &player("p"), "home", (0, 0, 0), (5, 5, 5))
            .await
            .unwrap();
        let zone = use_case
            .execute(&player("p"), &world(), "zone", cuboid((50, 0, 50), (55, 5, 55)), ClaimType::Region)
            .await
            .unwrap();

        assert_eq!(land.value.flag("pvp"), Some(&FlagValue::State(StateValue::Deny)));
        assert_eq!(zone.value.flag("pvp"), None);
    }

    #[tokio::test]
    async fn when_caller_is_console_then_player_required() {
        let fixture = Fixture::new();
        let use_case = DefineClaim::new(fixture.ctx.clone());

        let console = define(&use_case, &Caller::Console, "alpha", (0, 0, 0), (5, 5, 5)).await;
        assert_eq!(console, Err(ClaimError::PlayerRequired));
    }

    #[tokio::test]
    async fn when_save_fails_then_claim_is_live_and_warning_returned() {
        let mut store = MockRegionStore::new();
        store.expect_load().returning(|_| Ok(Vec::new()));
        store
            .expect_save()
            .returning(|_, _| Err(RepoError::io("save", "read-only file system")));
        let ctx = context(ClaimPolicy::default(), Arc::new(store), no_positions());
        let use_case = DefineClaim::new(ctx.clone());

        let committed = define(&use_case, &player("p"), "alpha", (0, 0, 0), (5, 5, 5))
            .await
            .unwrap();

        assert!(!committed.is_saved());
        assert!(matches!(
            committed.warnings.as_slice(),
            [ClaimWarning::NotSaved { .. }]
        ));
        let retry = define(&use_case, &player("p"), "alpha", (0, 0, 0), (5, 5, 5)).await;
        assert_eq!(retry, Err(ClaimError::DuplicateId("alpha".to_string())));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn when_players_race_for_same_spot_then_exactly_one_is_admitted() {
        let fixture = Fixture::new();
        let use_case = Arc::new(DefineClaim::new(fixture.ctx.clone()));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let use_case = Arc::clone(&use_case);
                tokio::spawn(async move {
                    let caller = player(&format!("racer{}", i));
                    define(&use_case, &caller, &format!("spot{}", i), (0, 0, 0), (10, 10, 10)).await
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(ClaimError::Overlap { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(admitted, 1);

        let regions = fixture.ctx.world(&world()).await.unwrap();
        assert_eq!(regions.read().await.len(), 1);
    }
}
