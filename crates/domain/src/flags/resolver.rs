//! Reading and writing flag values through the region hierarchy

use crate::aggregates::{Region, RegionGraph};
use crate::error::DomainError;
use crate::value_objects::{Actor, BlockVector, Role};

use super::definition::{FlagDef, ParseContext, RegionGroup};
use super::registry::FlagRegistry;
use super::value::FlagValue;

/// Flag access over a fixed registry.
///
/// Values resolve nearest-first: the region itself, then each ancestor, then
/// the flag's declared default. Flags with a group sub-flag only apply to the
/// actors whose role on the region falls in that group.
#[derive(Debug, Clone)]
pub struct FlagResolver {
    registry: FlagRegistry,
}

impl Default for FlagResolver {
    fn default() -> Self {
        Self::new(FlagRegistry::standard())
    }
}

impl FlagResolver {
    pub fn new(registry: FlagRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FlagRegistry {
        &self.registry
    }

    /// Stable enumeration, used for display and for unknown-flag suggestions.
    pub fn list_flags(&self) -> &[FlagDef] {
        self.registry.flags()
    }

    pub fn lookup(&self, name: &str) -> Option<&FlagDef> {
        self.registry.lookup(name)
    }

    pub fn parse(
        &self,
        def: &FlagDef,
        raw: &str,
        ctx: &ParseContext,
    ) -> Result<Option<FlagValue>, DomainError> {
        def.parse(raw, ctx)
    }

    /// Parse a value for the flag's group sub-flag.
    pub fn parse_group(&self, def: &FlagDef, raw: &str) -> Result<RegionGroup, DomainError> {
        let group_def = def
            .group_flag()
            .ok_or_else(|| DomainError::no_group_flag(def.name()))?;
        group_def
            .parse(raw, &ParseContext::default())?
            .and_then(|v| v.as_group())
            .ok_or_else(|| DomainError::invalid_flag_format(group_def.name(), "Expected a group"))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Store `value`, or clear the flag back to "inherit" with `None`.
    pub fn set_flag(
        &self,
        region: &mut Region,
        def: &FlagDef,
        value: Option<FlagValue>,
    ) -> Result<(), DomainError> {
        if let Some(v) = &value {
            if !def.accepts(v) {
                return Err(DomainError::invalid_flag_format(
                    def.name(),
                    format!("'{}' is not a value of this flag's type", v),
                ));
            }
        }
        region.put_flag(def.name(), value);
        Ok(())
    }

    /// Store (or clear) the group under the flag's sub-flag name.
    ///
    /// # Errors
    ///
    /// `DomainError::NoGroupFlag` if the flag declares no group sub-flag.
    pub fn set_group_flag(
        &self,
        region: &mut Region,
        def: &FlagDef,
        group: Option<RegionGroup>,
    ) -> Result<(), DomainError> {
        let group_def = def
            .group_flag()
            .ok_or_else(|| DomainError::no_group_flag(def.name()))?;
        region.put_flag(group_def.name(), group.map(FlagValue::Group));
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    fn stored<'a>(graph: &'a RegionGraph, region: &'a Region, name: &str) -> Option<&'a FlagValue> {
        graph.lineage(region).find_map(|r| r.flag(name))
    }

    /// Nearest set value in the chain, else the default. Ignores groups.
    pub fn resolve_effective<'a>(
        &self,
        graph: &'a RegionGraph,
        region: &'a Region,
        def: &'a FlagDef,
    ) -> Option<&'a FlagValue> {
        Self::stored(graph, region, def.name()).or_else(|| def.default_value())
    }

    /// Effective group of a flag on a region, falling back to the sub-flag default.
    pub fn resolve_group(&self, graph: &RegionGraph, region: &Region, def: &FlagDef) -> Option<RegionGroup> {
        let group_def = def.group_flag()?;
        Self::stored(graph, region, group_def.name())
            .and_then(FlagValue::as_group)
            .or_else(|| group_def.default_value().and_then(FlagValue::as_group))
            .or(Some(RegionGroup::All))
    }

    /// The chain value if it applies to `actor`. No actor counts as a non-member.
    fn applicable<'a>(
        &self,
        graph: &'a RegionGraph,
        region: &'a Region,
        def: &'a FlagDef,
        actor: Option<&Actor>,
    ) -> Option<&'a FlagValue> {
        let value = Self::stored(graph, region, def.name())?;
        if let Some(group) = self.resolve_group(graph, region, def) {
            let role = actor.map_or(Role::Neither, |a| graph.role_of(region, a));
            if !group.contains(role) {
                return None;
            }
        }
        Some(value)
    }

    /// Effective value for a specific actor on one region.
    pub fn resolve_for<'a>(
        &self,
        graph: &'a RegionGraph,
        region: &'a Region,
        def: &'a FlagDef,
        actor: Option<&Actor>,
    ) -> Option<&'a FlagValue> {
        self.applicable(graph, region, def, actor)
            .or_else(|| def.default_value())
    }

    /// Effective value at a point: the highest-priority region containing it
    /// that yields an applicable value, then the global region, then the default.
    pub fn resolve_at<'a>(
        &self,
        graph: &'a RegionGraph,
        point: BlockVector,
        def: &'a FlagDef,
        actor: Option<&Actor>,
    ) -> Option<&'a FlagValue> {
        graph
            .query_point(point)
            .into_iter()
            .find_map(|r| self.applicable(graph, r, def, actor))
            .or_else(|| {
                graph
                    .global()
                    .and_then(|g| self.applicable(graph, g, def, actor))
            })
            .or_else(|| def.default_value())
    }

    /// Flags set directly on a region, in registry order, as `(name, text)`.
    /// Group sub-flags follow their flag.
    pub fn describe_flags(&self, region: &Region) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for def in self.registry.flags() {
            if let Some(value) = region.flag(def.name()) {
                out.push((def.name().to_string(), def.format(value)));
            }
            if let Some(group_def) = def.group_flag() {
                if let Some(value) = region.flag(group_def.name()) {
                    out.push((group_def.name().to_string(), group_def.format(value)));
                }
            }
        }
        out
    }
}
