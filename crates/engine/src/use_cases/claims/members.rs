//! Owner and member management.

use std::sync::Arc;

use claimward_domain::{DomainEntry, Region, RegionId, WorldName};

use super::access::{Caller, ClaimAction};
use super::context::ClaimContext;
use super::error::{ClaimError, Committed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    AddOwner,
    RemoveOwner,
    AddMember,
    RemoveMember,
}

impl MembershipChange {
    fn action(self) -> ClaimAction {
        match self {
            MembershipChange::AddOwner => ClaimAction::AddOwner,
            MembershipChange::RemoveOwner => ClaimAction::RemoveOwner,
            MembershipChange::AddMember => ClaimAction::AddMember,
            MembershipChange::RemoveMember => ClaimAction::RemoveMember,
        }
    }

    fn apply(self, region: &mut Region, entry: DomainEntry) -> bool {
        match self {
            MembershipChange::AddOwner => region.owners_mut().add(entry),
            MembershipChange::RemoveOwner => region.owners_mut().remove(&entry),
            MembershipChange::AddMember => region.members_mut().add(entry),
            MembershipChange::RemoveMember => region.members_mut().remove(&entry),
        }
    }
}

/// Result of a membership change.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipOutcome {
    pub region: Region,
    /// Entries actually added or removed. Zero means nothing was written.
    pub changed: usize,
}

pub struct ManageMembers {
    ctx: Arc<ClaimContext>,
}

impl ManageMembers {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// Add or remove owners or members.
    ///
    /// # Arguments
    ///
    /// * `entries` - player names, or `g:<group>` for groups
    ///
    /// Adding a present entry or removing an absent one is a no-op. When no
    /// entry changes, nothing is saved.
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        id: &str,
        change: MembershipChange,
        entries: &[String],
    ) -> Result<Committed<MembershipOutcome>, ClaimError> {
        let id = RegionId::parse(id)?;
        let entries = entries
            .iter()
            .map(|raw| raw.parse::<DomainEntry>())
            .collect::<Result<Vec<_>, _>>()?;
        if entries.is_empty() {
            return Err(ClaimError::Validation(
                "At least one player or group is required".to_string(),
            ));
        }

        let regions = self.ctx.world(world).await?;
        let mut graph = regions.write().await;
        let region = graph
            .get(&id)
            .ok_or_else(|| ClaimError::NotFound { id: id.to_string() })?;
        self.ctx
            .access()
            .require_tiered(caller, &graph, region, change.action())?;

        let region = graph
            .get_mut(&id)
            .ok_or_else(|| ClaimError::NotFound { id: id.to_string() })?;
        let mut changed = 0;
        for entry in entries {
            if change.apply(region, entry) {
                changed += 1;
            }
        }
        let region = region.clone();

        if changed == 0 {
            return Ok(Committed::new(MembershipOutcome { region, changed }, Vec::new()));
        }
        let snapshot = regions.snapshot(&graph);
        drop(graph);

        tracing::info!(
            world = %world,
            region = %region.id(),
            caller = %caller,
            change = ?change,
            changed,
            "Claim membership changed"
        );

        let mut warnings = Vec::new();
        self.ctx.save(&regions, snapshot, &mut warnings).await;
        Ok(Committed::new(MembershipOutcome { region, changed }, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::claims::test_support::{actor, cuboid, player, world, Fixture};
    use claimward_domain::{ClaimType, GroupName, PlayerName};

    fn names(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    async fn setup() -> (Fixture, ManageMembers) {
        let fixture = Fixture::new();
        fixture
            .use_cases()
            .define
            .execute(&player("p"), &world(), "alpha", cuboid((0, 0, 0), (10, 10, 10)), ClaimType::Land)
            .await
            .unwrap();
        let members = ManageMembers::new(fixture.ctx.clone());
        (fixture, members)
    }

    #[tokio::test]
    async fn when_owner_adds_members_then_players_and_groups_are_stored() {
        let (fixture, members) = setup().await;

        let committed = members
            .execute(
                &player("p"),
                &world(),
                "alpha",
                MembershipChange::AddMember,
                &names(&["m", "g:builders"]),
            )
            .await
            .unwrap();

        assert_eq!(committed.value.changed, 2);
        let region = committed.value.region;
        assert!(region.members().contains_player(&PlayerName::new("m").unwrap()));
        assert!(region
            .members()
            .groups()
            .contains(&GroupName::new("builders").unwrap()));
        assert!(region.is_member(&actor("m")));
        assert_eq!(fixture.store.save_count(), 2);
    }

    #[tokio::test]
    async fn when_nothing_changes_then_nothing_is_saved() {
        let (fixture, members) = setup().await;

        let committed = members
            .execute(
                &player("p"),
                &world(),
                "alpha",
                MembershipChange::RemoveMember,
                &names(&["stranger"]),
            )
            .await
            .unwrap();

        assert_eq!(committed.value.changed, 0);
        assert_eq!(fixture.store.save_count(), 1);
    }

    #[tokio::test]
    async fn when_owner_added_then_new_owner_may_manage_region() {
        let (_fixture, members) = setup().await;
        members
            .execute(&player("p"), &world(), "alpha", MembershipChange::AddOwner, &names(&["q"]))
            .await
            .unwrap();

        let committed = members
            .execute(&player("q"), &world(), "alpha", MembershipChange::RemoveOwner, &names(&["p"]))
            .await
            .unwrap();

        assert!(!committed.value.region.is_owner(&actor("p")));
        assert!(committed.value.region.is_owner(&actor("q")));
    }

    #[tokio::test]
    async fn when_member_tries_to_add_owner_then_unauthorized() {
        let (_fixture, members) = setup().await;
        members
            .execute(&player("p"), &world(), "alpha", MembershipChange::AddMember, &names(&["m"]))
            .await
            .unwrap();

        let result = members
            .execute(&player("m"), &world(), "alpha", MembershipChange::AddOwner, &names(&["m"]))
            .await;

        assert_eq!(
            result,
            Err(ClaimError::Unauthorized {
                node: "claimward.claim.addowner.member.alpha".to_string()
            })
        );
    }

    #[tokio::test]
    async fn when_entry_is_malformed_or_missing_then_validation_fails() {
        let (_fixture, members) = setup().await;

        let empty = members
            .execute(&player("p"), &world(), "alpha", MembershipChange::AddMember, &[])
            .await;
        let bad = members
            .execute(&player("p"), &world(), "alpha", MembershipChange::AddMember, &names(&["g:"]))
            .await;

        assert!(matches!(empty, Err(ClaimError::Validation(_))));
        assert!(matches!(bad, Err(ClaimError::Validation(_))));
    }
}
