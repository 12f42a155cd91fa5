//! Effective flag lookup, as the host asks it when deciding whether an
//! action is allowed somewhere.

use std::sync::Arc;

use claimward_domain::{BlockVector, FlagDef, FlagValue, RegionId, WorldName};

use super::access::Caller;
use super::context::ClaimContext;
use super::error::ClaimError;

pub struct EffectiveFlag {
    ctx: Arc<ClaimContext>,
}

impl EffectiveFlag {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    fn definition(&self, flag: &str) -> Result<&FlagDef, ClaimError> {
        let resolver = self.ctx.resolver();
        resolver.lookup(flag).ok_or_else(|| ClaimError::UnknownFlag {
            name: flag.to_string(),
            available: resolver
                .list_flags()
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
        })
    }

    /// Value of `flag` for `caller` at `point`, group sub-flags applied.
    pub async fn at(
        &self,
        caller: &Caller,
        world: &WorldName,
        flag: &str,
        point: BlockVector,
    ) -> Result<Option<FlagValue>, ClaimError> {
        let def = self.definition(flag)?;
        let regions = self.ctx.world(world).await?;
        let graph = regions.read().await;
        Ok(self
            .ctx
            .resolver()
            .resolve_at(&graph, point, def, caller.actor())
            .cloned())
    }

    /// Value of `flag` on one region through its parents, ignoring groups.
    pub async fn on_region(
        &self,
        world: &WorldName,
        id: &str,
        flag: &str,
    ) -> Result<Option<FlagValue>, ClaimError> {
        let def = self.definition(flag)?;
        let id = RegionId::parse(id)?;
        let regions = self.ctx.world(world).await?;
        let graph = regions.read().await;
        let region = graph
            .get(&id)
            .ok_or_else(|| ClaimError::NotFound { id: id.to_string() })?;
        Ok(self
            .ctx
            .resolver()
            .resolve_effective(&graph, region, def)
            .cloned())
    }
}
