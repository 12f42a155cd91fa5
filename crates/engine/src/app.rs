//! Application state and composition.

use std::sync::Arc;

use claimward_domain::FlagResolver;

use crate::infrastructure::ports::{PermissionPort, PositionPort, RegionStore};
use crate::infrastructure::settings::EngineSettings;
use crate::stores::WorldRegistry;
use crate::use_cases::claims::{Access, ClaimContext};
use crate::use_cases::ClaimUseCases;

/// Main application state.
///
/// Holds the shared per-world region state and the use cases built on it.
/// A host embeds one `App` and routes its commands to `use_cases`.
pub struct App {
    pub worlds: Arc<WorldRegistry>,
    pub settings: Arc<EngineSettings>,
    pub use_cases: ClaimUseCases,
}

impl App {
    pub fn new(
        settings: EngineSettings,
        store: Arc<dyn RegionStore>,
        permissions: Arc<dyn PermissionPort>,
        positions: Arc<dyn PositionPort>,
    ) -> Self {
        let settings = Arc::new(settings);
        let worlds = Arc::new(WorldRegistry::new(store));
        let ctx = Arc::new(ClaimContext::new(
            worlds.clone(),
            Access::new(permissions),
            positions,
            Arc::new(FlagResolver::default()),
            settings.clone(),
        ));

        Self {
            worlds,
            settings,
            use_cases: ClaimUseCases::new(ctx),
        }
    }
}
