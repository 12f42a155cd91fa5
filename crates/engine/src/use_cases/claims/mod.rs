//! Claim use cases.
//!
//! Define, resize and remove claims, change their flags, owners, members and
//! parents, and read them back. Every mutation runs its checks and its write
//! under the world's write lock, then saves a snapshot after the lock is
//! released.

use std::sync::Arc;

mod access;
mod change;
mod context;
mod define;
mod effective;
mod error;
mod flag;
mod info;
mod list;
mod members;
mod parent;
mod remove;
mod select;

#[cfg(test)]
mod test_support;

pub use access::{
    flag_node, tiered_node, Access, Caller, ClaimAction, DEFINE_NODE, LIST_NODE, LIST_OWN_NODE,
    PERMISSION_ROOT, UNLIMITED_NODE,
};
pub use change::ChangeClaim;
pub use context::ClaimContext;
pub use define::DefineClaim;
pub use effective::EffectiveFlag;
pub use error::{ClaimError, ClaimWarning, Committed};
pub use flag::{FlagChange, FlagOutcome, SetClaimFlag};
pub use info::{ClaimInfo, RegionInfo};
pub use list::{ListClaims, ListFilter, ListedRegion, RegionPage, PAGE_SIZE};
pub use members::{ManageMembers, MembershipChange, MembershipOutcome};
pub use parent::SetClaimParent;
pub use remove::RemoveClaim;
pub use select::SelectClaim;

/// Container for claim use cases.
pub struct ClaimUseCases {
    pub define: Arc<DefineClaim>,
    pub change: Arc<ChangeClaim>,
    pub remove: Arc<RemoveClaim>,
    pub flag: Arc<SetClaimFlag>,
    pub members: Arc<ManageMembers>,
    pub parent: Arc<SetClaimParent>,
    pub info: Arc<ClaimInfo>,
    pub select: Arc<SelectClaim>,
    pub list: Arc<ListClaims>,
    pub effective: Arc<EffectiveFlag>,
}

impl ClaimUseCases {
    pub fn new(ctx: Arc<ClaimContext>) -> Self {
        Self {
            define: Arc::new(DefineClaim::new(ctx.clone())),
            change: Arc::new(ChangeClaim::new(ctx.clone())),
            remove: Arc::new(RemoveClaim::new(ctx.clone())),
            flag: Arc::new(SetClaimFlag::new(ctx.clone())),
            members: Arc::new(ManageMembers::new(ctx.clone())),
            parent: Arc::new(SetClaimParent::new(ctx.clone())),
            info: Arc::new(ClaimInfo::new(ctx.clone())),
            select: Arc::new(SelectClaim::new(ctx.clone())),
            list: Arc::new(ListClaims::new(ctx.clone())),
            effective: Arc::new(EffectiveFlag::new(ctx)),
        }
    }
}
