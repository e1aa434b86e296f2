// geodispatch: fair route dispatch over a geofenced coordinate pool
// Copyright (C) 2026 geodispatch Contributors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! The persisted area-configuration document (`{"areas": [...]}`), written
//! via temp-file + rename so a crash never leaves a half-written file — the
//! source writes in place, which this workspace treats as a defect to fix
//! rather than reproduce.

use std::path::PathBuf;

use async_trait::async_trait;
use dispatch_types::{AreaConfigDocument, AreaConfigStore, DispatchError};
use tokio::fs;

/// Reads/writes the area-config JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonAreaConfigStore {
    path: PathBuf,
}

impl JsonAreaConfigStore {
    /// Point the store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AreaConfigStore for JsonAreaConfigStore {
    async fn load(&self) -> Result<AreaConfigDocument, DispatchError> {
        let raw = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn mark_init_complete(&self, area_name: &str) -> Result<(), DispatchError> {
        let mut doc = self.load().await?;
        for area in &mut doc.areas {
            if area.name == area_name {
                area.init = false;
            }
        }
        let serialized = serde_json::to_string_pretty(&doc)?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serialized).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dispatch_types::AreaConfig;

    #[tokio::test]
    async fn flips_only_the_named_area() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        let doc = AreaConfigDocument {
            areas: vec![
                AreaConfig { name: "north".into(), init: true },
                AreaConfig { name: "south".into(), init: true },
            ],
        };
        tokio::fs::write(&path, serde_json::to_string(&doc).unwrap())
            .await
            .unwrap();

        let store = JsonAreaConfigStore::new(&path);
        store.mark_init_complete("north").await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert!(!reloaded.areas.iter().find(|a| a.name == "north").unwrap().init);
        assert!(reloaded.areas.iter().find(|a| a.name == "south").unwrap().init);
    }

    #[tokio::test]
    async fn write_goes_through_a_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        let doc = AreaConfigDocument {
            areas: vec![AreaConfig { name: "a".into(), init: true }],
        };
        tokio::fs::write(&path, serde_json::to_string(&doc).unwrap())
            .await
            .unwrap();

        let store = JsonAreaConfigStore::new(&path);
        store.mark_init_complete("a").await.unwrap();
        assert!(!dir.path().join("mappings.tmp").exists());
    }
}
