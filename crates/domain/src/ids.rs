use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of the implicit region covering a whole world.
pub const GLOBAL_REGION_ID: &str = "__global__";

/// Maximum length for player, group and world names
const MAX_NAME_LENGTH: usize = 64;

fn is_region_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ',' | '\'' | '-' | '+' | '/')
}

// ============================================================================
// RegionId
// ============================================================================

/// Case-preserving, case-insensitively compared region identifier.
///
/// The grammar is one or more of `A-Z a-z 0-9 _ , ' - + /`. Equality, ordering
/// and hashing all go through the lowercase form, so `Alpha` and `alpha` name
/// the same region while `Alpha` is still what gets displayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionId(String);

impl RegionId {
    /// Parse any grammatically valid id, including the reserved global id.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.is_empty() || !raw.chars().all(is_region_id_char) {
            return Err(DomainError::invalid_identifier(raw));
        }
        Ok(Self(raw))
    }

    /// Parse an id for a region created through the claim workflow.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidIdentifier` if the grammar does not match
    /// - `DomainError::ReservedIdentifier` for `__global__` in any casing
    pub fn claim(raw: impl Into<String>) -> Result<Self, DomainError> {
        let id = Self::parse(raw)?;
        if id.is_global() {
            return Err(DomainError::reserved_identifier(id.0));
        }
        Ok(id)
    }

    pub fn global() -> Self {
        Self(GLOBAL_REGION_ID.to_string())
    }

    pub fn is_global(&self) -> bool {
        self.0.eq_ignore_ascii_case(GLOBAL_REGION_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase lookup key.
    pub fn key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for RegionId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for RegionId {}

impl Hash for RegionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl PartialOrd for RegionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RegionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RegionId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<RegionId> for String {
    fn from(id: RegionId) -> String {
        id.0
    }
}

// ============================================================================
// Member names
// ============================================================================

macro_rules! define_name {
    ($name:ident, $label:literal) => {
        /// A validated, lowercased member name (non-empty, no whitespace, <=64 chars)
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
                let name = name.into();
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.len() > MAX_NAME_LENGTH {
                    return Err(DomainError::validation(format!(
                        concat!($label, " cannot exceed {} characters"),
                        MAX_NAME_LENGTH
                    )));
                }
                if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
                    return Err(DomainError::validation(format!(
                        concat!($label, " '{}' contains whitespace or control characters"),
                        trimmed
                    )));
                }
                Ok(Self(trimmed.to_lowercase()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

define_name!(PlayerName, "Player name");
define_name!(GroupName, "Group name");

// ============================================================================
// WorldName
// ============================================================================

/// Name of a world. Case-sensitive, as hosts treat world folders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorldName(String);

impl WorldName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("World name cannot be empty"));
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "World name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        if trimmed.starts_with('.')
            || trimmed
                .chars()
                .any(|c| c.is_control() || matches!(c, '/' | '\\'))
        {
            return Err(DomainError::validation(format!(
                "World name '{}' starts with a dot or contains path separators or control characters",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WorldName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<WorldName> for String {
    fn from(name: WorldName) -> String {
        name.0
    }
}
