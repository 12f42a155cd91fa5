//! Grant-table authorizer.
//!
//! Permission nodes are granted to players, to groups, or to everyone.
//! A grant ending in `.*` covers every node below it and `*` covers all
//! nodes, matching how hosts usually expand wildcard permissions.

use std::collections::{BTreeMap, BTreeSet};

use claimward_domain::{Actor, DomainEntry, DomainError, GroupName, PlayerName};

use crate::infrastructure::ports::PermissionPort;

/// Serializable grant table: `"*"` for everyone, a player name, or `g:<group>`.
pub type GrantConfig = BTreeMap<String, Vec<String>>;

const EVERYONE: &str = "*";

/// In-memory [`PermissionPort`].
#[derive(Debug, Clone, Default)]
pub struct GrantTable {
    everyone: BTreeSet<String>,
    players: BTreeMap<PlayerName, BTreeSet<String>>,
    groups: BTreeMap<GroupName, BTreeSet<String>>,
}

fn grant_covers(grant: &str, node: &str) -> bool {
    if grant == EVERYONE || grant.eq_ignore_ascii_case(node) {
        return true;
    }
    match grant.strip_suffix(".*") {
        Some(prefix) => node
            .get(..prefix.len())
            .zip(node.get(prefix.len()..))
            .is_some_and(|(head, rest)| {
                head.eq_ignore_ascii_case(prefix) && rest.len() > 1 && rest.starts_with('.')
            }),
        None => false,
    }
}

impl GrantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration keys: `*`, a player name, or `g:<group>`.
    pub fn from_config(config: &GrantConfig) -> Result<Self, DomainError> {
        let mut table = Self::new();
        for (subject, nodes) in config {
            for node in nodes {
                if subject == EVERYONE {
                    table.everyone.insert(node.clone());
                    continue;
                }
                match subject.parse::<DomainEntry>()? {
                    DomainEntry::Player(p) => {
                        table.players.entry(p).or_default().insert(node.clone());
                    }
                    DomainEntry::Group(g) => {
                        table.groups.entry(g).or_default().insert(node.clone());
                    }
                }
            }
        }
        Ok(table)
    }

    pub fn grant_everyone(mut self, node: impl Into<String>) -> Self {
        self.everyone.insert(node.into());
        self
    }

    pub fn grant_player(mut self, player: PlayerName, node: impl Into<String>) -> Self {
        self.players.entry(player).or_default().insert(node.into());
        self
    }

    pub fn grant_group(mut self, group: GroupName, node: impl Into<String>) -> Self {
        self.groups.entry(group).or_default().insert(node.into());
        self
    }

    fn grants_for<'a>(&'a self, actor: &'a Actor) -> impl Iterator<Item = &'a String> {
        let player = self.players.get(actor.name()).into_iter().flatten();
        let groups = actor
            .groups()
            .iter()
            .filter_map(|g| self.groups.get(g))
            .flatten();
        self.everyone.iter().chain(player).chain(groups)
    }
}

impl PermissionPort for GrantTable {
    fn has_permission(&self, actor: &Actor, node: &str) -> bool {
        self.grants_for(actor).any(|grant| grant_covers(grant, node))
    }
}
