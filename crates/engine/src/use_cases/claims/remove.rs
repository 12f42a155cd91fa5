//! Remove claim use case.

use std::sync::Arc;

use claimward_domain::{Region, RegionId, WorldName};

use super::access::{Caller, ClaimAction};
use super::context::ClaimContext;
use super::error::{ClaimError, Committed};

pub struct RemoveClaim {
    ctx: Arc<ClaimContext>,
}

impl RemoveClaim {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// Delete a region. Its children stay and become top-level.
    ///
    /// Returns the removed region.
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        id: &str,
    ) -> Result<Committed<Region>, ClaimError> {
        let id = RegionId::parse(id)?;
        if id.is_global() {
            return Err(ClaimError::ReservedIdentifier(id.to_string()));
        }

        let regions = self.ctx.world(world).await?;
        let mut graph = regions.write().await;
        let region = graph
            .get(&id)
            .ok_or_else(|| ClaimError::NotFound { id: id.to_string() })?;
        self.ctx
            .access()
            .require_tiered(caller, &graph, region, ClaimAction::Remove)?;
        let region = region.clone();
        let orphaned = graph.children_of(region.id()).len();

        graph.remove(region.id());
        let snapshot = regions.snapshot(&graph);
        drop(graph);

        tracing::info!(
            world = %world,
            region = %region.id(),
            caller = %caller,
            orphaned,
            "Claim removed"
        );

        let mut warnings = Vec::new();
        self.ctx.save(&regions, snapshot, &mut warnings).await;
        Ok(Committed::new(region, warnings))
    }
}
