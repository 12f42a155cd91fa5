//! Set parent use case.

use std::sync::Arc;

use claimward_domain::{Region, RegionId, WorldName};

use super::access::{Caller, ClaimAction};
use super::context::ClaimContext;
use super::error::{ClaimError, Committed};

pub struct SetClaimParent {
    ctx: Arc<ClaimContext>,
}

impl SetClaimParent {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// Link `child` under `parent`, or detach it with `None`.
    ///
    /// The caller needs `setparent` on the child and, when linking, on the
    /// parent too. Links that would close a loop are refused, and the global
    /// region takes no part in the hierarchy.
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        child: &str,
        parent: Option<&str>,
    ) -> Result<Committed<Region>, ClaimError> {
        let child = RegionId::parse(child)?;
        let parent = parent.map(RegionId::parse).transpose()?;
        if let Some(global) = std::iter::once(&child)
            .chain(parent.as_ref())
            .find(|id| id.is_global())
        {
            return Err(ClaimError::ReservedIdentifier(global.to_string()));
        }

        let regions = self.ctx.world(world).await?;
        let mut graph = regions.write().await;
        let access = self.ctx.access();

        let child_region = graph
            .get(&child)
            .ok_or_else(|| ClaimError::NotFound { id: child.to_string() })?;
        access.require_tiered(caller, &graph, child_region, ClaimAction::SetParent)?;
        if let Some(parent) = &parent {
            let parent_region = graph
                .get(parent)
                .ok_or_else(|| ClaimError::NotFound { id: parent.to_string() })?;
            access.require_tiered(caller, &graph, parent_region, ClaimAction::SetParent)?;
        }

        graph.set_parent(&child, parent.as_ref())?;
        let region = graph
            .get(&child)
            .cloned()
            .ok_or_else(|| ClaimError::NotFound { id: child.to_string() })?;
        let snapshot = regions.snapshot(&graph);
        drop(graph);

        tracing::info!(
            world = %world,
            region = %region.id(),
            parent = ?region.parent().map(RegionId::as_str),
            caller = %caller,
            "Claim parent changed"
        );

        let mut warnings = Vec::new();
        self.ctx.save(&regions, snapshot, &mut warnings).await;
        Ok(Committed::new(region, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::claims::test_support::{cuboid, player, world, Fixture};
    use claimward_domain::ClaimType;

    async fn setup() -> (Fixture, SetClaimParent) {
        let fixture = Fixture::new();
        let define = fixture.use_cases().define;
        for (id, x) in [("a", 0), ("b", 100), ("c", 200)] {
            define
                .execute(&player("p"), &world(), id, cuboid((x, 0, 0), (x + 10, 10, 10)), ClaimType::Land)
                .await
                .unwrap();
        }
        let parent = SetClaimParent::new(fixture.ctx.clone());
        (fixture, parent)
    }

    #[tokio::test]
    async fn when_linking_chain_then_parent_is_stored() {
        let (_fixture, set_parent) = setup().await;

        let committed = set_parent
            .execute(&player("p"), &world(), "b", Some("A"))
            .await
            .unwrap();

        assert_eq!(committed.value.parent().map(RegionId::as_str), Some("a"));
    }

    #[tokio::test]
    async fn when_link_would_close_loop_then_cycle_and_unchanged() {
        let (fixture, set_parent) = setup().await;
        set_parent.execute(&player("p"), &world(), "b", Some("a")).await.unwrap();
        set_parent.execute(&player("p"), &world(), "c", Some("b")).await.unwrap();

        let result = set_parent.execute(&player("p"), &world(), "a", Some("c")).await;

        assert_eq!(
            result,
            Err(ClaimError::Cycle {
                child: "a".to_string(),
                parent: "c".to_string()
            })
        );
        let regions = fixture.ctx.world(&world()).await.unwrap();
        assert_eq!(regions.read().await.lookup_exact("a").unwrap().parent(), None);
    }

    #[tokio::test]
    async fn when_parent_is_self_then_cycle() {
        let (_fixture, set_parent) = setup().await;

        let result = set_parent.execute(&player("p"), &world(), "a", Some("a")).await;

        assert!(matches!(result, Err(ClaimError::Cycle { .. })));
    }

    #[tokio::test]
    async fn when_detaching_then_parent_is_cleared() {
        let (_fixture, set_parent) = setup().await;
        set_parent.execute(&player("p"), &world(), "b", Some("a")).await.unwrap();

        let committed = set_parent.execute(&player("p"), &world(), "b", None).await.unwrap();

        assert_eq!(committed.value.parent(), None);
    }

    #[tokio::test]
    async fn when_parent_belongs_to_someone_else_then_unauthorized() {
        let (fixture, set_parent) = setup().await;
        fixture
            .use_cases()
            .define
            .execute(&player("q"), &world(), "q1", cuboid((300, 0, 0), (310, 10, 10)), ClaimType::Land)
            .await
            .unwrap();

        let result = set_parent.execute(&player("p"), &world(), "a", Some("q1")).await;

        assert_eq!(
            result,
            Err(ClaimError::Unauthorized {
                node: "claimward.claim.setparent.q1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn when_parent_missing_then_not_found() {
        let (_fixture, set_parent) = setup().await;

        let result = set_parent.execute(&player("p"), &world(), "a", Some("zzz")).await;

        assert_eq!(result, Err(ClaimError::NotFound { id: "zzz".to_string() }));
    }

    #[tokio::test]
    async fn when_global_is_child_or_parent_then_reserved() {
        let (_fixture, set_parent) = setup().await;

        let as_child = set_parent.execute(&player("p"), &world(), "__global__", Some("a")).await;
        let as_parent = set_parent.execute(&player("p"), &world(), "a", Some("__GLOBAL__")).await;

        assert!(matches!(as_child, Err(ClaimError::ReservedIdentifier(_))));
        assert!(matches!(as_parent, Err(ClaimError::ReservedIdentifier(_))));
    }
}
