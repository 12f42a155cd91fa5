//! Membership domains and acting identities
//!
//! A [`Domain`] is the set of players and groups holding a role on a region.
//! Mutation is idempotent: adding a present entry or removing an absent one
//! is a no-op, reported through the returned `bool`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{GroupName, PlayerName};

/// Prefix marking a group entry in textual member lists (`g:builders`).
pub const GROUP_PREFIX: &str = "g:";

/// Identity performing an operation: a player plus the groups they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    name: PlayerName,
    groups: BTreeSet<GroupName>,
}

impl Actor {
    pub fn new(name: PlayerName) -> Self {
        Self {
            name,
            groups: BTreeSet::new(),
        }
    }

    pub fn with_group(mut self, group: GroupName) -> Self {
        self.groups.insert(group);
        self
    }

    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    pub fn groups(&self) -> &BTreeSet<GroupName> {
        &self.groups
    }
}

/// The tier an actor holds on a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Owner,
    Member,
    Neither,
}

/// One entry of a member list, parsed from `name` or `g:group`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEntry {
    Player(PlayerName),
    Group(GroupName),
}

impl std::str::FromStr for DomainEntry {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.get(..GROUP_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(GROUP_PREFIX) => {
                Ok(DomainEntry::Group(GroupName::new(&s[GROUP_PREFIX.len()..])?))
            }
            _ => Ok(DomainEntry::Player(PlayerName::new(s)?)),
        }
    }
}

/// A set of players and groups attached to a region under one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    players: BTreeSet<PlayerName>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    groups: BTreeSet<GroupName>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, player: PlayerName) -> bool {
        self.players.insert(player)
    }

    pub fn remove_player(&mut self, player: &PlayerName) -> bool {
        self.players.remove(player)
    }

    pub fn add_group(&mut self, group: GroupName) -> bool {
        self.groups.insert(group)
    }

    pub fn remove_group(&mut self, group: &GroupName) -> bool {
        self.groups.remove(group)
    }

    pub fn add(&mut self, entry: DomainEntry) -> bool {
        match entry {
            DomainEntry::Player(p) => self.add_player(p),
            DomainEntry::Group(g) => self.add_group(g),
        }
    }

    pub fn remove(&mut self, entry: &DomainEntry) -> bool {
        match entry {
            DomainEntry::Player(p) => self.remove_player(p),
            DomainEntry::Group(g) => self.remove_group(g),
        }
    }

    pub fn players(&self) -> &BTreeSet<PlayerName> {
        &self.players
    }

    pub fn groups(&self) -> &BTreeSet<GroupName> {
        &self.groups
    }

    /// Direct player membership only.
    pub fn contains_player(&self, player: &PlayerName) -> bool {
        self.players.contains(player)
    }

    /// Present directly, or through any group the actor belongs to.
    pub fn contains(&self, actor: &Actor) -> bool {
        self.players.contains(actor.name()) || actor.groups().iter().any(|g| self.groups.contains(g))
    }

    /// Entries of both domains.
    pub fn union(&self, other: &Domain) -> Domain {
        Domain {
            players: self.players.union(&other.players).cloned().collect(),
            groups: self.groups.union(&other.groups).cloned().collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.players.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl fmt::Display for Domain {
    /// Players first, then groups with their `g:` prefix, comma separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .players
            .iter()
            .map(ToString::to_string)
            .chain(self.groups.iter().map(|g| format!("{}{}", GROUP_PREFIX, g)))
            .collect();
        write!(f, "{}", entries.join(", "))
    }
}
