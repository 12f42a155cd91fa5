//! Host-side collaborators: authorization and player positions.

use claimward_domain::{Actor, BlockVector};

// =============================================================================
// Authorization
// =============================================================================

/// Permission lookup against the host's authorization system.
///
/// Nodes are dotted strings such as `claimward.claim.remove.own.alpha`.
#[cfg_attr(test, mockall::automock)]
pub trait PermissionPort: Send + Sync {
    fn has_permission(&self, actor: &Actor, node: &str) -> bool;
}

// =============================================================================
// Position
// =============================================================================

/// Where a player currently stands, for commands that infer a region.
#[cfg_attr(test, mockall::automock)]
pub trait PositionPort: Send + Sync {
    fn position_of(&self, actor: &Actor) -> Option<BlockVector>;
}
