//! Claim operation errors and post-commit warnings.

use claimward_domain::{ClaimConflict, DomainError, RegionId};

use crate::infrastructure::ports::RepoError;

fn join_ids(ids: &[RegionId]) -> String {
    ids.iter()
        .map(RegionId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors returned before anything was committed. Retrying after fixing the
/// cause is always safe.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClaimError {
    #[error("Invalid region id: {0}")]
    InvalidIdentifier(String),
    #[error("The region id '{0}' is reserved")]
    ReservedIdentifier(String),
    #[error("A region named '{0}' already exists")]
    DuplicateId(String),
    #[error("Could not find a region named '{id}'")]
    NotFound { id: String },
    #[error("You own {owned} regions in this world and the limit is {limit}")]
    QuotaExceeded { limit: i32, owned: usize },
    #[error("This claim overlaps regions owned by someone else: {}", join_ids(.conflicting))]
    Overlap { conflicting: Vec<RegionId> },
    #[error("This claim is too close to regions owned by someone else: {}", join_ids(.conflicting))]
    Proximity { conflicting: Vec<RegionId> },
    #[error("Setting the parent of '{child}' to '{parent}' would create circular inheritance")]
    Cycle { child: String, parent: String },
    #[error("Invalid value for flag '{flag}': {reason}")]
    InvalidFlagFormat { flag: String, reason: String },
    #[error("Region flag '{0}' does not have a group flag")]
    NoGroupFlag(String),
    #[error("Unknown flag '{name}'. Available flags: {}", .available.join(", "))]
    UnknownFlag { name: String, available: Vec<String> },
    #[error("Missing permission {node}")]
    Unauthorized { node: String },
    #[error("Claim area {actual} exceeds the maximum of {max}")]
    AreaExceeded { max: i64, actual: i64 },
    #[error("Region '{0}' cannot be selected")]
    NotSelectable(String),
    #[error("No region id given and no region found at the current position")]
    NoRegionAtPosition,
    #[error("This operation needs a player")]
    PlayerRequired,
    #[error("{0}")]
    Validation(String),
    #[error("Region storage failed: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for ClaimError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::Parse(msg) => ClaimError::Validation(msg),
            DomainError::InvalidIdentifier(id) => ClaimError::InvalidIdentifier(id),
            DomainError::ReservedIdentifier(id) => ClaimError::ReservedIdentifier(id),
            DomainError::InvalidFlagFormat { flag, reason } => {
                ClaimError::InvalidFlagFormat { flag, reason }
            }
            DomainError::NoGroupFlag(flag) => ClaimError::NoGroupFlag(flag),
            DomainError::UnknownFlag(name) => ClaimError::UnknownFlag {
                name,
                available: Vec::new(),
            },
            DomainError::Cycle { child, parent } => ClaimError::Cycle { child, parent },
            DomainError::NotFound { id, .. } => ClaimError::NotFound { id },
        }
    }
}

impl From<ClaimConflict> for ClaimError {
    fn from(conflict: ClaimConflict) -> Self {
        match conflict {
            ClaimConflict::Overlap(conflicting) => ClaimError::Overlap { conflicting },
            ClaimConflict::Proximity(conflicting) => ClaimError::Proximity { conflicting },
        }
    }
}

/// Something the caller should hear about a change that did take effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimWarning {
    /// The claim was admitted although its footprint is above the limit.
    AreaExceedsLimit { max: i64, actual: i64 },
    /// The change is live in memory but saving it failed.
    NotSaved { cause: String },
}

/// A committed change and the warnings raised after the commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    pub value: T,
    pub warnings: Vec<ClaimWarning>,
}

impl<T> Committed<T> {
    pub fn new(value: T, warnings: Vec<ClaimWarning>) -> Self {
        Self { value, warnings }
    }

    /// False when the change could not be saved.
    pub fn is_saved(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, ClaimWarning::NotSaved { .. }))
    }
}
