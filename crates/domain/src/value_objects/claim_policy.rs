//! Per-world claim limits

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregates::ClaimType;
use crate::error::DomainError;
use crate::flags::{FlagDef, FlagRegistry, FlagValue, ParseContext};

use super::geometry::Cuboid;

/// What happens when a claim's footprint exceeds `max_claim_area`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaLimitMode {
    /// Admit and tell the actor.
    #[default]
    Warn,
    /// Refuse the claim.
    Reject,
}

/// Limits and presets applied by the claim workflow in one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimPolicy {
    /// Lowest Y a claim extends down to.
    pub claim_floor: i32,
    /// World height; claims extend up to `max_height - 1`.
    pub max_height: i32,
    /// Minimum gap to regions owned by others.
    pub border_distance: i32,
    /// Recommended maximum footprint in blocks.
    pub max_claim_area: i64,
    /// Regions one identity may own; negative means unlimited.
    pub max_region_count: i32,
    /// Negative-priority regions neither block claims nor count as conflicts.
    pub ignore_negative_priority: bool,
    pub area_limit: AreaLimitMode,
    /// Flag presets applied to new regions, by claim type, as textual values.
    pub default_flags: BTreeMap<ClaimType, BTreeMap<String, String>>,
}

impl Default for ClaimPolicy {
    fn default() -> Self {
        Self {
            claim_floor: 0,
            max_height: 256,
            border_distance: 5,
            max_claim_area: 10_000,
            max_region_count: 7,
            ignore_negative_priority: true,
            area_limit: AreaLimitMode::Warn,
            default_flags: BTreeMap::new(),
        }
    }
}

impl ClaimPolicy {
    /// Check numeric sanity and that every default flag parses.
    pub fn validate(&self, registry: &FlagRegistry) -> Result<(), DomainError> {
        if self.max_height <= self.claim_floor {
            return Err(DomainError::validation(format!(
                "max_height ({}) must be above claim_floor ({})",
                self.max_height, self.claim_floor
            )));
        }
        if self.border_distance < 0 {
            return Err(DomainError::validation("border_distance cannot be negative"));
        }
        if self.max_claim_area < 0 {
            return Err(DomainError::validation("max_claim_area cannot be negative"));
        }
        for claim_type in self.default_flags.keys() {
            self.default_flags_for(*claim_type, registry)?;
        }
        Ok(())
    }

    /// `(floor, ceiling)` a claim is stretched to.
    pub fn vertical_bounds(&self) -> (i32, i32) {
        (self.claim_floor, self.max_height.saturating_sub(1))
    }

    /// A requested volume stretched to the claimable height range.
    pub fn claim_volume(&self, requested: &Cuboid) -> Cuboid {
        let (floor, ceiling) = self.vertical_bounds();
        requested.expand_vertical(floor, ceiling)
    }

    /// Whether an identity owning `owned` regions is at the limit.
    pub fn quota_reached(&self, owned: usize) -> bool {
        usize::try_from(self.max_region_count).is_ok_and(|max| owned >= max)
    }

    /// The footprint of `volume` when it exceeds `max_claim_area`.
    pub fn area_exceeded(&self, volume: &Cuboid) -> Option<i64> {
        let area = volume.area();
        (area > self.max_claim_area).then_some(area)
    }

    /// Parsed default flags for a claim type, in name order.
    pub fn default_flags_for<'r>(
        &self,
        claim_type: ClaimType,
        registry: &'r FlagRegistry,
    ) -> Result<Vec<(&'r FlagDef, Option<FlagValue>)>, DomainError> {
        let Some(presets) = self.default_flags.get(&claim_type) else {
            return Ok(Vec::new());
        };
        presets
            .iter()
            .map(|(name, raw)| {
                let def = registry.require(name)?;
                Ok((def, def.parse(raw, &ParseContext::default())?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::StateValue;
    use crate::value_objects::BlockVector;

    #[test]
    fn test_negative_limit_is_unlimited() {
        let policy = ClaimPolicy {
            max_region_count: -1,
            ..ClaimPolicy::default()
        };
        assert!(!policy.quota_reached(0));
        assert!(!policy.quota_reached(10_000));
    }

    #[test]
    fn test_quota_reached_at_limit() {
        let policy = ClaimPolicy {
            max_region_count: 2,
            ..ClaimPolicy::default()
        };
        assert!(!policy.quota_reached(1));
        assert!(policy.quota_reached(2));

        let none_allowed = ClaimPolicy {
            max_region_count: 0,
            ..ClaimPolicy::default()
        };
        assert!(none_allowed.quota_reached(0));
    }

    #[test]
    fn test_claim_volume_spans_world_height() {
        let policy = ClaimPolicy {
            claim_floor: 5,
            ..ClaimPolicy::default()
        };
        let requested = Cuboid::normalize(BlockVector::new(0, 60, 0), BlockVector::new(9, 70, 9));
        let volume = policy.claim_volume(&requested);
        assert_eq!(volume.min().y, 5);
        assert_eq!(volume.max().y, 255);
        assert_eq!(volume.min().x, 0);
    }

    #[test]
    fn test_area_exceeded() {
        let policy = ClaimPolicy {
            max_claim_area: 100,
            ..ClaimPolicy::default()
        };
        let ten = Cuboid::normalize(BlockVector::new(0, 0, 0), BlockVector::new(9, 0, 9));
        let eleven = Cuboid::normalize(BlockVector::new(0, 0, 0), BlockVector::new(10, 0, 9));
        assert_eq!(policy.area_exceeded(&ten), None);
        assert_eq!(policy.area_exceeded(&eleven), Some(110));
    }

    #[test]
    fn test_default_flags_parse_against_registry() {
        let registry = FlagRegistry::standard();
        let mut policy = ClaimPolicy::default();
        policy.default_flags.insert(
            ClaimType::Land,
            BTreeMap::from([("pvp".to_string(), "deny".to_string())]),
        );
        assert!(policy.validate(&registry).is_ok());

        let flags = policy.default_flags_for(ClaimType::Land, &registry).unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].0.name(), "pvp");
        assert_eq!(flags[0].1, Some(FlagValue::State(StateValue::Deny)));
        assert!(policy
            .default_flags_for(ClaimType::Region, &registry)
            .unwrap()
            .is_empty());

        policy.default_flags.insert(
            ClaimType::Region,
            BTreeMap::from([("pvp".to_string(), "sometimes".to_string())]),
        );
        assert!(policy.validate(&registry).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy: ClaimPolicy =
            serde_json::from_str(r#"{"border_distance": 3, "area_limit": "reject"}"#).unwrap();
        assert_eq!(policy.border_distance, 3);
        assert_eq!(policy.area_limit, AreaLimitMode::Reject);
        assert_eq!(policy.max_region_count, 7);
    }
}
