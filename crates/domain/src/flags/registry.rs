//! The table of known flags
//!
//! Built once at startup and queried by normalized name: hyphens are
//! stripped and case is ignored, so `chest-access`, `ChestAccess` and
//! `chestaccess` all find the same definition.

use std::collections::HashMap;

use crate::error::DomainError;

use super::definition::{FlagDef, RegionGroup, SetElement};

const ENTITY_TYPES: &[&str] = &[
    "blaze", "cave_spider", "chicken", "cow", "creeper", "enderman", "ghast", "giant",
    "iron_golem", "magma_cube", "mushroom_cow", "ocelot", "pig", "pig_zombie", "sheep",
    "silverfish", "skeleton", "slime", "snowman", "spider", "squid", "villager", "wolf",
    "zombie",
];

const GAME_MODES: &[&str] = &["survival", "creative", "adventure"];

/// Strip hyphens and lowercase.
pub fn normalize_flag_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase()
}

/// Ordered, name-indexed set of flag definitions.
#[derive(Debug, Clone, Default)]
pub struct FlagRegistry {
    flags: Vec<FlagDef>,
    index: HashMap<String, usize>,
}

impl FlagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in flag table.
    pub fn standard() -> Self {
        let defs = vec![
            FlagDef::state("passthrough"),
            FlagDef::state("build").with_group(RegionGroup::NonMembers),
            FlagDef::state("pvp"),
            FlagDef::state("mob-damage"),
            FlagDef::state("mob-spawning"),
            FlagDef::state("creeper-explosion"),
            FlagDef::state("other-explosion"),
            FlagDef::state("tnt"),
            FlagDef::state("lighter"),
            FlagDef::state("fire-spread"),
            FlagDef::state("lava-fire"),
            FlagDef::state("lightning"),
            FlagDef::state("chest-access").with_group(RegionGroup::NonMembers),
            FlagDef::state("water-flow"),
            FlagDef::state("lava-flow"),
            FlagDef::state("use").with_group(RegionGroup::NonMembers),
            FlagDef::state("vehicle-place"),
            FlagDef::state("vehicle-destroy"),
            FlagDef::state("sleep"),
            FlagDef::state("item-drop"),
            FlagDef::state("enderpearl"),
            FlagDef::state("potion-splash"),
            FlagDef::state("invincible"),
            FlagDef::state("send-chat"),
            FlagDef::state("receive-chat"),
            FlagDef::state("entry").with_group(RegionGroup::NonMembers),
            FlagDef::state("exit").with_group(RegionGroup::NonMembers),
            FlagDef::text("greeting").with_group(RegionGroup::All),
            FlagDef::text("farewell").with_group(RegionGroup::All),
            FlagDef::boolean("notify-enter"),
            FlagDef::boolean("notify-leave"),
            FlagDef::set("deny-spawn", SetElement::Choice(ENTITY_TYPES)),
            FlagDef::integer("heal-delay"),
            FlagDef::integer("heal-amount"),
            FlagDef::integer("feed-delay"),
            FlagDef::integer("feed-amount"),
            FlagDef::vector("teleport").with_group(RegionGroup::Members),
            FlagDef::vector("spawn").with_group(RegionGroup::Members),
            FlagDef::choice("game-mode", GAME_MODES),
            FlagDef::set("blocked-cmds", SetElement::Command).with_group(RegionGroup::All),
            FlagDef::set("allowed-cmds", SetElement::Command).with_group(RegionGroup::All),
            FlagDef::players("blocked-players"),
        ];

        let mut registry = Self::new();
        for def in defs {
            registry.push(def);
        }
        registry
    }

    fn push(&mut self, def: FlagDef) {
        self.index
            .insert(normalize_flag_name(def.name()), self.flags.len());
        self.flags.push(def);
    }

    /// Add a definition.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` if its name (or its group sub-flag's name)
    /// collides with a registered flag after normalization.
    pub fn register(&mut self, def: FlagDef) -> Result<(), DomainError> {
        let mut names = vec![normalize_flag_name(def.name())];
        if let Some(group) = def.group_flag() {
            names.push(normalize_flag_name(group.name()));
        }
        for name in &names {
            let taken = self.index.contains_key(name)
                || self
                    .flags
                    .iter()
                    .filter_map(FlagDef::group_flag)
                    .any(|g| normalize_flag_name(g.name()) == *name);
            if taken {
                return Err(DomainError::validation(format!(
                    "Flag '{}' is already registered",
                    def.name()
                )));
            }
        }
        self.push(def);
        Ok(())
    }

    /// Hyphen- and case-insensitive lookup of a top-level flag.
    pub fn lookup(&self, name: &str) -> Option<&FlagDef> {
        self.index
            .get(&normalize_flag_name(name))
            .map(|&i| &self.flags[i])
    }

    /// Like [`lookup`](Self::lookup) but fails with `DomainError::UnknownFlag`.
    pub fn require(&self, name: &str) -> Result<&FlagDef, DomainError> {
        self.lookup(name)
            .ok_or_else(|| DomainError::unknown_flag(name))
    }

    /// Stable enumeration in registration order.
    pub fn flags(&self) -> &[FlagDef] {
        &self.flags
    }

    pub fn names(&self) -> Vec<&str> {
        self.flags.iter().map(FlagDef::name).collect()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
