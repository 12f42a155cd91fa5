//! Dependencies shared by every claim use case.

use std::sync::Arc;

use claimward_domain::{
    AreaLimitMode, BlockVector, ClaimPolicy, Cuboid, FlagResolver, OverlapPolicy, ParseContext,
    RegionGraph, RegionId, WorldName,
};

use crate::infrastructure::ports::PositionPort;
use crate::infrastructure::settings::EngineSettings;
use crate::stores::{Snapshot, WorldRegions, WorldRegistry};

use super::access::{Access, Caller};
use super::error::{ClaimError, ClaimWarning};

pub struct ClaimContext {
    worlds: Arc<WorldRegistry>,
    access: Access,
    positions: Arc<dyn PositionPort>,
    resolver: Arc<FlagResolver>,
    settings: Arc<EngineSettings>,
}

impl ClaimContext {
    pub fn new(
        worlds: Arc<WorldRegistry>,
        access: Access,
        positions: Arc<dyn PositionPort>,
        resolver: Arc<FlagResolver>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        Self {
            worlds,
            access,
            positions,
            resolver,
            settings,
        }
    }

    pub fn access(&self) -> &Access {
        &self.access
    }

    pub fn resolver(&self) -> &FlagResolver {
        &self.resolver
    }

    pub fn policy(&self, world: &WorldName) -> &ClaimPolicy {
        self.settings.policy_for(world)
    }

    pub async fn world(&self, world: &WorldName) -> Result<Arc<WorldRegions>, ClaimError> {
        Ok(self.worlds.world(world).await?)
    }

    /// Where the calling player stands, if known.
    pub fn position_of(&self, caller: &Caller) -> Option<BlockVector> {
        caller.actor().and_then(|a| self.positions.position_of(a))
    }

    pub fn parse_context(&self, caller: &Caller) -> ParseContext {
        self.position_of(caller)
            .map(ParseContext::at)
            .unwrap_or_default()
    }

    /// The id given, or the highest-priority region at the caller's position.
    pub fn target_id(
        &self,
        graph: &RegionGraph,
        caller: &Caller,
        id: Option<&str>,
    ) -> Result<RegionId, ClaimError> {
        if let Some(raw) = id {
            return Ok(RegionId::parse(raw)?);
        }
        caller.require_player()?;
        let position = self
            .position_of(caller)
            .ok_or(ClaimError::NoRegionAtPosition)?;
        graph
            .query_point(position)
            .first()
            .map(|r| r.id().clone())
            .ok_or(ClaimError::NoRegionAtPosition)
    }

    /// Overlap, proximity and area checks for placing `id` at `volume`.
    ///
    /// Returns the warnings to report if the placement is admitted.
    pub fn check_placement(
        &self,
        graph: &RegionGraph,
        policy: &ClaimPolicy,
        caller: &Caller,
        id: &RegionId,
        volume: &Cuboid,
    ) -> Result<Vec<ClaimWarning>, ClaimError> {
        let actor = caller.require_player()?;
        OverlapPolicy::from_policy(policy)
            .evaluate(graph, id, volume, policy.border_distance, actor)
            .map_err(|conflict| {
                tracing::debug!(
                    region = %id,
                    player = %actor.name(),
                    conflicting = ?conflict.region_ids(),
                    "Claim placement rejected"
                );
                ClaimError::from(conflict)
            })?;

        let mut warnings = Vec::new();
        if self.access.is_unlimited(caller) {
            return Ok(warnings);
        }
        if let Some(actual) = policy.area_exceeded(volume) {
            let max = policy.max_claim_area;
            match policy.area_limit {
                AreaLimitMode::Reject => return Err(ClaimError::AreaExceeded { max, actual }),
                AreaLimitMode::Warn => {
                    tracing::warn!(
                        region = %id,
                        player = %actor.name(),
                        area = actual,
                        max,
                        "Claim exceeds the recommended maximum area"
                    );
                    warnings.push(ClaimWarning::AreaExceedsLimit { max, actual });
                }
            }
        }
        Ok(warnings)
    }

    /// Save a committed snapshot, turning a failure into a warning.
    pub async fn save(
        &self,
        world: &WorldRegions,
        snapshot: Snapshot,
        warnings: &mut Vec<ClaimWarning>,
    ) {
        if let Err(e) = world.persist(self.worlds.store(), snapshot).await {
            tracing::warn!(
                world = %world.world(),
                error = %e,
                "Region change is live but could not be saved"
            );
            warnings.push(ClaimWarning::NotSaved {
                cause: e.to_string(),
            });
        }
    }
}
