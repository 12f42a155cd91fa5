//! Claimward Engine - region audit entry point.
//!
//! Loads every persisted world, reports what loading had to repair, and
//! writes repaired worlds back so the fixes stick.

use std::sync::Arc;

use claimward_engine::infrastructure::{
    json_store::JsonRegionStore,
    permissions::GrantTable,
    ports::RegionStore,
    settings::EngineSettings,
    telemetry::init_tracing,
};
use claimward_engine::stores::WorldRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    init_tracing();

    let settings = EngineSettings::from_env()?;
    tracing::info!(
        data_dir = %settings.data_dir.display(),
        world_policies = settings.world_policies.len(),
        "Starting Claimward region audit"
    );

    // Fail early on grants the host could not apply either.
    GrantTable::from_config(&settings.permissions)?;

    let store: Arc<dyn RegionStore> = Arc::new(JsonRegionStore::new(settings.data_dir.clone()));
    let registry = WorldRegistry::new(store.clone());

    let worlds = store.list_worlds().await?;
    let mut repaired = 0;
    for name in &worlds {
        let world = registry.world(name).await?;
        let regions = world.read().await.len();
        let report = world.load_report();
        tracing::info!(
            world = %name,
            regions,
            repaired_parents = report.repaired_parents.len(),
            duplicates = report.duplicates.len(),
            "World loaded"
        );
        if report.is_clean() {
            continue;
        }

        let snapshot = {
            let graph = world.read().await;
            world.snapshot(&graph)
        };
        world.persist(store.as_ref(), snapshot).await?;
        tracing::info!(world = %name, "Repaired world saved");
        repaired += 1;
    }

    tracing::info!(worlds = worlds.len(), repaired, "Region audit complete");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
