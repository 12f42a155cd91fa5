//! JSON file region storage.
//!
//! One file per world at `<root>/<world>/regions.json`. Saves write a sibling
//! temp file and rename it over the old one, so a crash mid-save leaves the
//! previous file intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use claimward_domain::{Region, WorldName};

use crate::infrastructure::ports::{RegionStore, RepoError};

const REGIONS_FILE: &str = "regions.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct RegionFile {
    version: u32,
    regions: Vec<Region>,
}

/// File-backed [`RegionStore`].
pub struct JsonRegionStore {
    root: PathBuf,
}

impl JsonRegionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn world_file(&self, world: &WorldName) -> PathBuf {
        self.root.join(world.as_str()).join(REGIONS_FILE)
    }
}

#[async_trait]
impl RegionStore for JsonRegionStore {
    async fn load(&self, world: &WorldName) -> Result<Vec<Region>, RepoError> {
        let path = self.world_file(world);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::io("load", format!("{}: {}", path.display(), e))),
        };
        let file: RegionFile = serde_json::from_slice(&bytes)
            .map_err(|e| RepoError::serialization(format!("{}: {}", path.display(), e)))?;
        if file.version > FORMAT_VERSION {
            return Err(RepoError::serialization(format!(
                "{}: unsupported format version {}",
                path.display(),
                file.version
            )));
        }
        Ok(file.regions)
    }

    async fn save(&self, world: &WorldName, regions: &[Region]) -> Result<(), RepoError> {
        let path = self.world_file(world);
        let dir = self.root.join(world.as_str());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RepoError::io("save", format!("{}: {}", dir.display(), e)))?;

        let file = RegionFile {
            version: FORMAT_VERSION,
            regions: regions.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&file).map_err(RepoError::serialization)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| RepoError::io("save", format!("{}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| RepoError::io("save", format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    async fn list_worlds(&self) -> Result<Vec<WorldName>, RepoError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::io("list_worlds", e)),
        };

        let mut worlds = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::io("list_worlds", e))?
        {
            if !entry.path().join(REGIONS_FILE).is_file() {
                continue;
            }
            let name = entry.file_name();
            match name.to_str().map(WorldName::new) {
                Some(Ok(world)) => worlds.push(world),
                _ => tracing::warn!(dir = ?name, "Skipping directory that is not a valid world name"),
            }
        }
        worlds.sort();
        Ok(worlds)
    }
}
