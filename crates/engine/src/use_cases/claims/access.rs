//! Who may do what to which region.
//!
//! Most actions check a node tiered by the caller's role on the target
//! region: `claimward.claim.<action>.own.<id>` for owners,
//! `claimward.claim.<action>.member.<id>` for members and
//! `claimward.claim.<action>.<id>` for everyone else. Roles are inherited
//! from ancestors. The console holds every permission.

use std::fmt;
use std::sync::Arc;

use claimward_domain::{Actor, Region, RegionGraph, RegionId, Role};

use crate::infrastructure::ports::PermissionPort;

use super::error::ClaimError;

pub const PERMISSION_ROOT: &str = "claimward.claim";
pub const DEFINE_NODE: &str = "claimward.claim.define";
pub const UNLIMITED_NODE: &str = "claimward.claim.unlimited";
pub const LIST_NODE: &str = "claimward.claim.list";
pub const LIST_OWN_NODE: &str = "claimward.claim.list.own";

/// Who is calling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Console,
    Player(Actor),
}

impl Caller {
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Caller::Console => None,
            Caller::Player(actor) => Some(actor),
        }
    }

    /// The acting player, for operations that need a position or an owner.
    pub fn require_player(&self) -> Result<&Actor, ClaimError> {
        self.actor().ok_or(ClaimError::PlayerRequired)
    }

    /// Role on `region`, inherited through its ancestors. The console is
    /// neither owner nor member.
    pub fn role_on(&self, graph: &RegionGraph, region: &Region) -> Role {
        self.actor()
            .map_or(Role::Neither, |actor| graph.role_of(region, actor))
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Console => write!(f, "console"),
            Caller::Player(actor) => write!(f, "{}", actor.name()),
        }
    }
}

/// Region-level actions with tiered permission nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimAction {
    Change,
    Select,
    Info,
    Flag,
    Remove,
    AddOwner,
    RemoveOwner,
    AddMember,
    RemoveMember,
    SetParent,
}

impl ClaimAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimAction::Change => "change",
            ClaimAction::Select => "select",
            ClaimAction::Info => "info",
            ClaimAction::Flag => "flag",
            ClaimAction::Remove => "remove",
            ClaimAction::AddOwner => "addowner",
            ClaimAction::RemoveOwner => "removeowner",
            ClaimAction::AddMember => "addmember",
            ClaimAction::RemoveMember => "removemember",
            ClaimAction::SetParent => "setparent",
        }
    }
}

/// `claimward.claim.<action>[.own|.member].<id>`
pub fn tiered_node(action: ClaimAction, role: Role, id: &RegionId) -> String {
    let tier = match role {
        Role::Owner => ".own",
        Role::Member => ".member",
        Role::Neither => "",
    };
    format!("{}.{}{}.{}", PERMISSION_ROOT, action.as_str(), tier, id.key())
}

/// `claimward.claim.flag.flags.<flag>[.owner|.member].<id>`
pub fn flag_node(flag: &str, role: Role, id: &RegionId) -> String {
    let tier = match role {
        Role::Owner => ".owner",
        Role::Member => ".member",
        Role::Neither => "",
    };
    format!("{}.flag.flags.{}{}.{}", PERMISSION_ROOT, flag, tier, id.key())
}

/// Permission checks against the authorization port.
#[derive(Clone)]
pub struct Access {
    permissions: Arc<dyn PermissionPort>,
}

impl Access {
    pub fn new(permissions: Arc<dyn PermissionPort>) -> Self {
        Self { permissions }
    }

    pub fn allowed(&self, caller: &Caller, node: &str) -> bool {
        match caller {
            Caller::Console => true,
            Caller::Player(actor) => self.permissions.has_permission(actor, node),
        }
    }

    pub fn require(&self, caller: &Caller, node: &str) -> Result<(), ClaimError> {
        if self.allowed(caller, node) {
            Ok(())
        } else {
            tracing::debug!(caller = %caller, node, "Permission denied");
            Err(ClaimError::Unauthorized {
                node: node.to_string(),
            })
        }
    }

    /// Check the node for `action` at the caller's tier on `region`.
    pub fn require_tiered(
        &self,
        caller: &Caller,
        graph: &RegionGraph,
        region: &Region,
        action: ClaimAction,
    ) -> Result<(), ClaimError> {
        let role = caller.role_on(graph, region);
        self.require(caller, &tiered_node(action, role, region.id()))
    }

    /// Exempt from the region quota and the area limit.
    pub fn is_unlimited(&self, caller: &Caller) -> bool {
        self.allowed(caller, UNLIMITED_NODE)
    }
}
