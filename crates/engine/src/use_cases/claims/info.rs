//! Region info use case.

use std::sync::Arc;

use claimward_domain::{ClaimType, Cuboid, Domain, RegionId, WorldName};

use super::access::{Caller, ClaimAction};
use super::context::ClaimContext;
use super::error::ClaimError;

/// Point-in-time view of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionInfo {
    pub id: RegionId,
    pub claim_type: ClaimType,
    /// `cuboid` or `global`.
    pub shape: &'static str,
    pub priority: i32,
    /// Flags set on the region itself, in registry order, formatted.
    pub flags: Vec<(String, String)>,
    pub parent: Option<RegionId>,
    /// Ancestors from the direct parent upwards.
    pub ancestors: Vec<RegionId>,
    pub owners: Domain,
    pub members: Domain,
    pub bounds: Option<Cuboid>,
}

pub struct ClaimInfo {
    ctx: Arc<ClaimContext>,
}

impl ClaimInfo {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// Describe a region, or the highest-priority region at the caller's
    /// position when `id` is `None`.
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        id: Option<&str>,
    ) -> Result<RegionInfo, ClaimError> {
        let regions = self.ctx.world(world).await?;
        let graph = regions.read().await;
        let id = self.ctx.target_id(&graph, caller, id)?;
        let region = graph
            .get(&id)
            .ok_or_else(|| ClaimError::NotFound { id: id.to_string() })?;
        self.ctx
            .access()
            .require_tiered(caller, &graph, region, ClaimAction::Info)?;

        Ok(RegionInfo {
            id: region.id().clone(),
            claim_type: region.claim_type(),
            shape: region.shape().type_name(),
            priority: region.priority(),
            flags: self.ctx.resolver().describe_flags(region),
            parent: region.parent().cloned(),
            ancestors: graph.ancestors(region).map(|r| r.id().clone()).collect(),
            owners: region.owners().clone(),
            members: region.members().clone(),
            bounds: region.bounds().copied(),
        })
    }
}
