//! Select claim use case: hand a region's bounds back to the caller's
//! selection tool.

use std::sync::Arc;

use claimward_domain::{Cuboid, WorldName};

use super::access::{Caller, ClaimAction};
use super::context::ClaimContext;
use super::error::ClaimError;

pub struct SelectClaim {
    ctx: Arc<ClaimContext>,
}

impl SelectClaim {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        id: Option<&str>,
    ) -> Result<Cuboid, ClaimError> {
        caller.require_player()?;
        let regions = self.ctx.world(world).await?;
        let graph = regions.read().await;
        let id = self.ctx.target_id(&graph, caller, id)?;
        let region = graph
            .get(&id)
            .ok_or_else(|| ClaimError::NotFound { id: id.to_string() })?;
        self.ctx
            .access()
            .require_tiered(caller, &graph, region, ClaimAction::Select)?;

        region
            .bounds()
            .copied()
            .ok_or_else(|| ClaimError::NotSelectable(region.id().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::claims::flag::FlagChange;
    use crate::use_cases::claims::members::MembershipChange;
    use crate::use_cases::claims::test_support::{admin, cuboid, player, world, Fixture};
    use claimward_domain::ClaimType;

    async fn setup() -> Fixture {
        let fixture = Fixture::new();
        fixture
            .use_cases()
            .define
            .execute(&player("p"), &world(), "alpha", cuboid((0, 0, 0), (10, 10, 10)), ClaimType::Land)
            .await
            .unwrap();
        fixture
    }

    #[tokio::test]
    async fn when_owner_or_member_selects_then_bounds_are_returned() {
        let fixture = setup().await;
        fixture
            .use_cases()
            .members
            .execute(
                &player("p"),
                &world(),
                "alpha",
                MembershipChange::AddMember,
                &["m".to_string()],
            )
            .await
            .unwrap();
        let select = SelectClaim::new(fixture.ctx.clone());

        let by_owner = select.execute(&player("p"), &world(), Some("alpha")).await.unwrap();
        let by_member = select.execute(&player("m"), &world(), Some("alpha")).await.unwrap();

        assert_eq!(by_owner, by_member);
        assert_eq!(by_owner.max().x, 10);
    }

    #[tokio::test]
    async fn when_stranger_selects_then_unauthorized() {
        let fixture = setup().await;

        let result = SelectClaim::new(fixture.ctx.clone())
            .execute(&player("q"), &world(), Some("alpha"))
            .await;

        assert_eq!(
            result,
            Err(ClaimError::Unauthorized {
                node: "claimward.claim.select.alpha".to_string()
            })
        );
    }

    #[tokio::test]
    async fn when_global_is_selected_then_not_selectable() {
        let fixture = setup().await;
        fixture
            .use_cases()
            .flag
            .execute(&Caller::Console, &world(), "__global__", "pvp", FlagChange::set("deny"))
            .await
            .unwrap();

        let result = SelectClaim::new(fixture.ctx.clone())
            .execute(&admin("a"), &world(), Some("__global__"))
            .await;

        assert_eq!(result, Err(ClaimError::NotSelectable("__global__".to_string())));
    }

    #[tokio::test]
    async fn when_console_selects_then_player_required() {
        let fixture = setup().await;

        let result = SelectClaim::new(fixture.ctx.clone())
            .execute(&Caller::Console, &world(), Some("alpha"))
            .await;

        assert_eq!(result, Err(ClaimError::PlayerRequired));
    }
}
