//! Flag definitions and their textual parsers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::PlayerName;
use crate::value_objects::{BlockVector, Role};

use super::value::FlagValue;

/// Allow/deny value of a state flag. "No opinion" is the absence of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateValue {
    Allow,
    Deny,
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Allow => write!(f, "allow"),
            StateValue::Deny => write!(f, "deny"),
        }
    }
}

/// Who a flag applies to, stored under a flag's group sub-flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionGroup {
    Owners,
    Members,
    NonOwners,
    NonMembers,
    All,
    None,
}

impl RegionGroup {
    /// Members include owners; non-members exclude both.
    pub fn contains(&self, role: Role) -> bool {
        match self {
            RegionGroup::Owners => role == Role::Owner,
            RegionGroup::Members => matches!(role, Role::Owner | Role::Member),
            RegionGroup::NonOwners => role != Role::Owner,
            RegionGroup::NonMembers => role == Role::Neither,
            RegionGroup::All => true,
            RegionGroup::None => false,
        }
    }
}

impl fmt::Display for RegionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionGroup::Owners => "owners",
            RegionGroup::Members => "members",
            RegionGroup::NonOwners => "nonowners",
            RegionGroup::NonMembers => "nonmembers",
            RegionGroup::All => "all",
            RegionGroup::None => "none",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for RegionGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "owner" | "owners" => Ok(RegionGroup::Owners),
            "member" | "members" => Ok(RegionGroup::Members),
            "nonowner" | "nonowners" => Ok(RegionGroup::NonOwners),
            "nonmember" | "nonmembers" => Ok(RegionGroup::NonMembers),
            "all" | "everyone" | "anyone" => Ok(RegionGroup::All),
            "none" | "noone" | "nobody" => Ok(RegionGroup::None),
            _ => Err(DomainError::parse(format!("Unknown group '{}'", s.trim()))),
        }
    }
}

/// Element type of a set flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetElement {
    /// One of a fixed list of lowercase choices
    Choice(&'static [&'static str]),
    /// A slash command; a missing leading `/` is added
    Command,
}

/// Value type of a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    State,
    Boolean,
    Integer,
    Text,
    Choice(&'static [&'static str]),
    Set(SetElement),
    Group,
    Vector,
    Players,
}

/// Extra information a parser may draw on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseContext {
    /// Position of the acting identity, used by `here` on vector flags.
    pub position: Option<BlockVector>,
}

impl ParseContext {
    pub fn at(position: BlockVector) -> Self {
        Self {
            position: Some(position),
        }
    }
}

/// Immutable flag definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagDef {
    name: String,
    kind: FlagKind,
    default: Option<FlagValue>,
    group: Option<Box<FlagDef>>,
}

impl FlagDef {
    fn plain(name: &str, kind: FlagKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: None,
            group: None,
        }
    }

    /// A state flag whose group sub-flag defaults to everyone.
    pub fn state(name: &str) -> Self {
        Self::plain(name, FlagKind::State).with_group(RegionGroup::All)
    }

    pub fn boolean(name: &str) -> Self {
        Self::plain(name, FlagKind::Boolean)
    }

    pub fn integer(name: &str) -> Self {
        Self::plain(name, FlagKind::Integer)
    }

    pub fn text(name: &str) -> Self {
        Self::plain(name, FlagKind::Text)
    }

    pub fn choice(name: &str, choices: &'static [&'static str]) -> Self {
        Self::plain(name, FlagKind::Choice(choices))
    }

    pub fn set(name: &str, element: SetElement) -> Self {
        Self::plain(name, FlagKind::Set(element))
    }

    pub fn vector(name: &str) -> Self {
        Self::plain(name, FlagKind::Vector)
    }

    pub fn players(name: &str) -> Self {
        Self::plain(name, FlagKind::Players)
    }

    /// Attach (or replace) a `<name>-group` sub-flag with the given default group.
    pub fn with_group(mut self, default: RegionGroup) -> Self {
        let mut group = Self::plain(&format!("{}-group", self.name), FlagKind::Group);
        group.default = Some(FlagValue::Group(default));
        self.group = Some(Box::new(group));
        self
    }

    pub fn with_default(mut self, value: FlagValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }

    pub fn group_flag(&self) -> Option<&FlagDef> {
        self.group.as_deref()
    }

    /// Whether `value` has the variant this flag stores.
    pub fn accepts(&self, value: &FlagValue) -> bool {
        matches!(
            (self.kind, value),
            (FlagKind::State, FlagValue::State(_))
                | (FlagKind::Boolean, FlagValue::Boolean(_))
                | (FlagKind::Integer, FlagValue::Integer(_))
                | (FlagKind::Text, FlagValue::Text(_))
                | (FlagKind::Choice(_), FlagValue::Choice(_))
                | (FlagKind::Set(_), FlagValue::Set(_))
                | (FlagKind::Group, FlagValue::Group(_))
                | (FlagKind::Vector, FlagValue::Vector(_))
                | (FlagKind::Players, FlagValue::Players(_))
        )
    }

    /// Parse user text into a typed value.
    ///
    /// `Ok(None)` means the text asks for the flag to be cleared (`none` on a
    /// state flag).
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidFlagFormat` with a human-readable reason.
    pub fn parse(&self, raw: &str, ctx: &ParseContext) -> Result<Option<FlagValue>, DomainError> {
        let fail = |reason: String| DomainError::invalid_flag_format(&self.name, reason);
        let input = raw.trim();

        let value = match self.kind {
            FlagKind::State => match input.to_lowercase().as_str() {
                "allow" => FlagValue::State(StateValue::Allow),
                "deny" => FlagValue::State(StateValue::Deny),
                "none" => return Ok(None),
                _ => return Err(fail(format!("Expected none/allow/deny but got '{}'", input))),
            },
            FlagKind::Boolean => match input.to_lowercase().as_str() {
                "true" | "yes" | "on" | "allow" => FlagValue::Boolean(true),
                "false" | "no" | "off" | "deny" => FlagValue::Boolean(false),
                _ => return Err(fail(format!("Not a yes/no value: {}", input))),
            },
            FlagKind::Integer => FlagValue::Integer(
                input
                    .parse()
                    .map_err(|_| fail(format!("Not a number: {}", input)))?,
            ),
            // Free text keeps its inner spacing.
            FlagKind::Text => FlagValue::Text(raw.to_string()),
            FlagKind::Choice(choices) => FlagValue::Choice(
                match_choice(choices, input).ok_or_else(|| {
                    fail(format!(
                        "Unknown value '{}', expected one of: {}",
                        input,
                        choices.join(", ")
                    ))
                })?,
            ),
            FlagKind::Set(element) => {
                let mut items = std::collections::BTreeSet::new();
                for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let parsed = match element {
                        SetElement::Choice(choices) => {
                            match_choice(choices, item).ok_or_else(|| {
                                fail(format!("Unknown set element '{}'", item))
                            })?
                        }
                        SetElement::Command => {
                            let lowered = item.to_lowercase();
                            if lowered.starts_with('/') {
                                lowered
                            } else {
                                format!("/{}", lowered)
                            }
                        }
                    };
                    items.insert(parsed);
                }
                FlagValue::Set(items)
            }
            FlagKind::Group => FlagValue::Group(input.parse().map_err(|_| {
                fail(format!(
                    "Unknown group '{}', expected owners, members, nonowners, nonmembers, all or none",
                    input
                ))
            })?),
            FlagKind::Vector => {
                if input.eq_ignore_ascii_case("here") {
                    FlagValue::Vector(
                        ctx.position
                            .ok_or_else(|| fail("'here' needs a known position".to_string()))?,
                    )
                } else {
                    FlagValue::Vector(input.parse().map_err(|e: DomainError| fail(e.to_string()))?)
                }
            }
            FlagKind::Players => {
                let mut players = std::collections::BTreeSet::new();
                for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    players.insert(PlayerName::new(item).map_err(|e| fail(e.to_string()))?);
                }
                FlagValue::Players(players)
            }
        };
        Ok(Some(value))
    }

    /// Render a value so that `parse(format(v)) == v`.
    pub fn format(&self, value: &FlagValue) -> String {
        value.to_string()
    }
}

fn match_choice(choices: &'static [&'static str], input: &str) -> Option<String> {
    choices
        .iter()
        .find(|c| c.eq_ignore_ascii_case(input))
        .map(|c| c.to_string())
}
