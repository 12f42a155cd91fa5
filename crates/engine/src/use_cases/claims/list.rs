//! List claims use case.

use std::sync::Arc;

use claimward_domain::{PlayerName, Region, RegionId, Role, WorldName};

use super::access::{Caller, LIST_NODE, LIST_OWN_NODE};
use super::context::ClaimContext;
use super::error::ClaimError;

pub const PAGE_SIZE: usize = 10;

/// Which regions to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    /// Regions the caller owns or is a member of, inherited roles and groups
    /// included.
    Own,
    /// Regions naming this player directly as owner or member.
    Player(PlayerName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedRegion {
    pub id: RegionId,
    /// Role of the filtered identity. Always `Neither` for unfiltered lists.
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPage {
    pub entries: Vec<ListedRegion>,
    /// 1-based.
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

pub struct ListClaims {
    ctx: Arc<ClaimContext>,
}

fn rank(role: Role) -> u8 {
    match role {
        Role::Owner => 0,
        Role::Member => 1,
        Role::Neither => 2,
    }
}

fn player_role(region: &Region, player: &PlayerName) -> Role {
    if region.owners().contains_player(player) {
        Role::Owner
    } else if region.members().contains_player(player) {
        Role::Member
    } else {
        Role::Neither
    }
}

impl ListClaims {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// One page of region ids, owners first, then members, then by id.
    ///
    /// Callers without `claimward.claim.list` only ever see their own
    /// regions, whatever filter they ask for. Page 0 is read as page 1.
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        filter: ListFilter,
        page: usize,
    ) -> Result<RegionPage, ClaimError> {
        let access = self.ctx.access();
        let names_caller = match (&filter, caller.actor()) {
            (ListFilter::Player(name), Some(actor)) => name == actor.name(),
            _ => false,
        };
        let own = matches!(filter, ListFilter::Own)
            || names_caller
            || !access.allowed(caller, LIST_NODE);
        if own {
            access.require(caller, LIST_OWN_NODE)?;
        }

        let regions = self.ctx.world(world).await?;
        let graph = regions.read().await;
        let mut entries: Vec<ListedRegion> = if own {
            let actor = caller.require_player()?;
            graph
                .iter()
                .map(|r| ListedRegion {
                    id: r.id().clone(),
                    role: graph.role_of(r, actor),
                })
                .filter(|e| e.role != Role::Neither)
                .collect()
        } else {
            match &filter {
                ListFilter::Player(player) => graph
                    .iter()
                    .map(|r| ListedRegion {
                        id: r.id().clone(),
                        role: player_role(r, player),
                    })
                    .filter(|e| e.role != Role::Neither)
                    .collect(),
                _ => graph
                    .iter()
                    .map(|r| ListedRegion {
                        id: r.id().clone(),
                        role: Role::Neither,
                    })
                    .collect(),
            }
        };
        drop(graph);

        entries.sort_by(|a, b| rank(a.role).cmp(&rank(b.role)).then_with(|| a.id.cmp(&b.id)));

        let total = entries.len();
        let pages = total.div_ceil(PAGE_SIZE);
        let page = page.max(1);
        let entries = entries
            .into_iter()
            .skip((page - 1).saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .collect();

        Ok(RegionPage {
            entries,
            page,
            pages,
            total,
        })
    }
}
