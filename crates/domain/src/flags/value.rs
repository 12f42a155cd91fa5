use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::PlayerName;
use crate::value_objects::BlockVector;

use super::definition::{RegionGroup, StateValue};

/// A typed flag value as stored on a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FlagValue {
    State(StateValue),
    Boolean(bool),
    Integer(i64),
    Text(String),
    Choice(String),
    Set(BTreeSet<String>),
    Group(RegionGroup),
    Vector(BlockVector),
    Players(BTreeSet<PlayerName>),
}

impl FlagValue {
    pub fn as_state(&self) -> Option<StateValue> {
        match self {
            FlagValue::State(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<RegionGroup> {
        match self {
            FlagValue::Group(g) => Some(*g),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::State(s) => write!(f, "{}", s),
            FlagValue::Boolean(b) => write!(f, "{}", b),
            FlagValue::Integer(i) => write!(f, "{}", i),
            FlagValue::Text(t) => write!(f, "{}", t),
            FlagValue::Choice(c) => write!(f, "{}", c),
            FlagValue::Set(items) => {
                let joined: Vec<&str> = items.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(","))
            }
            FlagValue::Group(g) => write!(f, "{}", g),
            FlagValue::Vector(v) => write!(f, "{}", v),
            FlagValue::Players(players) => {
                let joined: Vec<&str> = players.iter().map(PlayerName::as_str).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&FlagValue::State(StateValue::Deny)).unwrap();
        assert_eq!(json, r#"{"type":"state","value":"deny"}"#);
        let back: FlagValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_state(), Some(StateValue::Deny));
    }

    #[test]
    fn test_display_group() {
        assert_eq!(FlagValue::Group(RegionGroup::NonMembers).to_string(), "nonmembers");
    }
}
