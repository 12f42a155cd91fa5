//! Set flag use case.
//!
//! Writes or clears one flag, and optionally its group sub-flag, on a region.
//! The reserved `__global__` id addresses the world-wide region, which is
//! created on the first write that targets it.

use std::sync::Arc;

use claimward_domain::{FlagDef, FlagValue, Region, RegionGroup, RegionId, WorldName};

use super::access::{flag_node, Caller, ClaimAction};
use super::context::ClaimContext;
use super::error::{ClaimError, Committed};

/// Requested flag change, in textual form.
///
/// With neither part set the flag and its group sub-flag are both cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagChange {
    /// Raw value. `none` on a state flag clears it.
    pub value: Option<String>,
    /// Raw group for the sub-flag (`-g`).
    pub group: Option<String>,
}

impl FlagChange {
    pub fn set(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            group: None,
        }
    }

    pub fn clear() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    fn is_clear(&self) -> bool {
        self.value.is_none() && self.group.is_none()
    }
}

/// What a region's flag looks like after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagOutcome {
    pub region: RegionId,
    pub flag: String,
    /// Formatted stored value, `None` when unset.
    pub value: Option<String>,
    /// Stored group sub-flag, `None` when unset or absent.
    pub group: Option<RegionGroup>,
}

/// Parsed writes, computed before anything is touched.
enum FlagWrite {
    Clear,
    Update {
        value: Option<Option<FlagValue>>,
        group: Option<RegionGroup>,
    },
}

pub struct SetClaimFlag {
    ctx: Arc<ClaimContext>,
}

impl SetClaimFlag {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self { ctx }
    }

    /// Change a flag on a region.
    ///
    /// # Arguments
    ///
    /// * `id` - region id; `__global__` targets the world-wide region
    /// * `flag` - flag name, matched ignoring case and hyphens
    /// * `change` - raw value and group; both absent clears the flag
    ///
    /// # Errors
    ///
    /// `UnknownFlag` lists only the flags the caller may set on this region.
    pub async fn execute(
        &self,
        caller: &Caller,
        world: &WorldName,
        id: &str,
        flag: &str,
        change: FlagChange,
    ) -> Result<Committed<FlagOutcome>, ClaimError> {
        let id = RegionId::parse(id)?;
        let regions = self.ctx.world(world).await?;
        let resolver = self.ctx.resolver();
        let access = self.ctx.access();

        let mut graph = regions.write().await;

        let implicit_global = Region::global();
        let region = match graph.get(&id) {
            Some(region) => region,
            None if id.is_global() => &implicit_global,
            None => return Err(ClaimError::NotFound { id: id.to_string() }),
        };
        access.require_tiered(caller, &graph, region, ClaimAction::Flag)?;
        let role = caller.role_on(&graph, region);
        let region_id = region.id().clone();

        let def = match resolver.lookup(flag) {
            Some(def) => def,
            None => {
                let available = resolver
                    .list_flags()
                    .iter()
                    .map(FlagDef::name)
                    .filter(|name| access.allowed(caller, &flag_node(name, role, &region_id)))
                    .map(str::to_string)
                    .collect();
                return Err(ClaimError::UnknownFlag {
                    name: flag.to_string(),
                    available,
                });
            }
        };
        access.require(caller, &flag_node(def.name(), role, &region_id))?;

        let write = self.plan(caller, def, &change)?;

        let target = if region_id.is_global() {
            graph.global_mut()
        } else {
            graph
                .get_mut(&region_id)
                .ok_or_else(|| ClaimError::NotFound { id: region_id.to_string() })?
        };
        match write {
            FlagWrite::Clear => {
                resolver.set_flag(target, def, None)?;
                if def.group_flag().is_some() {
                    resolver.set_group_flag(target, def, None)?;
                }
            }
            FlagWrite::Update { value, group } => {
                if let Some(value) = value {
                    resolver.set_flag(target, def, value)?;
                }
                if let Some(group) = group {
                    resolver.set_group_flag(target, def, Some(group))?;
                }
            }
        }
        let outcome = FlagOutcome {
            region: region_id,
            flag: def.name().to_string(),
            value: target.flag(def.name()).map(|v| def.format(v)),
            group: def
                .group_flag()
                .and_then(|g| target.flag(g.name()))
                .and_then(FlagValue::as_group),
        };
        let snapshot = regions.snapshot(&graph);
        drop(graph);

        tracing::info!(
            world = %world,
            region = %outcome.region,
            caller = %caller,
            flag = %outcome.flag,
            value = ?outcome.value,
            group = ?outcome.group,
            "Claim flag changed"
        );

        let mut warnings = Vec::new();
        self.ctx.save(&regions, snapshot, &mut warnings).await;
        Ok(Committed::new(outcome, warnings))
    }

    fn plan(&self, caller: &Caller, def: &FlagDef, change: &FlagChange) -> Result<FlagWrite, ClaimError> {
        if change.is_clear() {
            return Ok(FlagWrite::Clear);
        }
        let resolver = self.ctx.resolver();
        let group = change
            .group
            .as_deref()
            .map(|raw| resolver.parse_group(def, raw))
            .transpose()?;
        let value = change
            .value
            .as_deref()
            .map(|raw| resolver.parse(def, raw, &self.ctx.parse_context(caller)))
            .transpose()?;
        Ok(FlagWrite::Update { value, group })
    }
}
