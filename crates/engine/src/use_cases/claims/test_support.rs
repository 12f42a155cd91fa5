//! Shared fixtures for claim use case tests.

use std::sync::Arc;

use claimward_domain::{
    Actor, BlockVector, ClaimPolicy, Cuboid, FlagResolver, GroupName, LinearIndex, PlayerName,
    WorldName,
};

use crate::infrastructure::memory_store::InMemoryRegionStore;
use crate::infrastructure::permissions::GrantTable;
use crate::infrastructure::ports::{MockPositionPort, RegionStore};
use crate::infrastructure::settings::EngineSettings;
use crate::stores::WorldRegistry;

use super::access::{Access, Caller};
use super::context::ClaimContext;
use super::ClaimUseCases;

/// Grants an ordinary player holds in these tests.
const PLAYER_GRANTS: &[&str] = &[
    "claimward.claim.define",
    "claimward.claim.change.own.*",
    "claimward.claim.remove.own.*",
    "claimward.claim.select.own.*",
    "claimward.claim.select.member.*",
    "claimward.claim.info.*",
    "claimward.claim.flag.own.*",
    "claimward.claim.flag.flags.*",
    "claimward.claim.addmember.own.*",
    "claimward.claim.removemember.own.*",
    "claimward.claim.addowner.own.*",
    "claimward.claim.removeowner.own.*",
    "claimward.claim.setparent.own.*",
    "claimward.claim.list.own",
];

pub const ADMINS: &str = "admins";

pub fn world() -> WorldName {
    WorldName::new("overworld").unwrap()
}

pub fn cuboid(a: (i32, i32, i32), b: (i32, i32, i32)) -> Cuboid {
    Cuboid::normalize(BlockVector::new(a.0, a.1, a.2), BlockVector::new(b.0, b.1, b.2))
}

pub fn actor(name: &str) -> Actor {
    Actor::new(PlayerName::new(name).unwrap())
}

pub fn player(name: &str) -> Caller {
    Caller::Player(actor(name))
}

/// A player in the `admins` group, which holds every permission.
pub fn admin(name: &str) -> Caller {
    Caller::Player(actor(name).with_group(GroupName::new(ADMINS).unwrap()))
}

pub fn grants() -> GrantTable {
    PLAYER_GRANTS
        .iter()
        .fold(GrantTable::new(), |table, node| table.grant_everyone(*node))
        .grant_group(GroupName::new(ADMINS).unwrap(), "*")
}

pub fn no_positions() -> MockPositionPort {
    let mut positions = MockPositionPort::new();
    positions.expect_position_of().returning(|_| None);
    positions
}

pub fn positioned_at(point: BlockVector) -> MockPositionPort {
    let mut positions = MockPositionPort::new();
    positions
        .expect_position_of()
        .returning(move |_| Some(point));
    positions
}

pub struct Fixture {
    pub ctx: Arc<ClaimContext>,
    pub store: Arc<InMemoryRegionStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_policy(ClaimPolicy::default())
    }

    pub fn with_policy(policy: ClaimPolicy) -> Self {
        Self::build(policy, no_positions())
    }

    pub fn build(policy: ClaimPolicy, positions: MockPositionPort) -> Self {
        let store = Arc::new(InMemoryRegionStore::new());
        let ctx = context(policy, store.clone(), positions);
        Self { ctx, store }
    }

    pub fn use_cases(&self) -> ClaimUseCases {
        ClaimUseCases::new(self.ctx.clone())
    }
}

/// Context over any store, indexed linearly.
pub fn context(
    policy: ClaimPolicy,
    store: Arc<dyn RegionStore>,
    positions: MockPositionPort,
) -> Arc<ClaimContext> {
    let settings = EngineSettings {
        default_policy: policy,
        ..EngineSettings::default()
    };
    let worlds = WorldRegistry::with_index(store, Arc::new(|| Box::new(LinearIndex::new())));
    Arc::new(ClaimContext::new(
        Arc::new(worlds),
        Access::new(Arc::new(grants())),
        Arc::new(positions),
        Arc::new(FlagResolver::default()),
        Arc::new(settings),
    ))
}
