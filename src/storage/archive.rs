//! Parameter archive — versioned JSON snapshots of simulation parameters
//!
//! Each snapshot is written as its own file and recorded in `manifest.json`
//! with a SHA-256 checksum. Loads verify the checksum before deserializing,
//! and deserialization re-validates tables and re-pads sequence buffers.

use crate::error::{DataError, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";

/// Metadata for one archived snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub version: u64,
    pub timestamp: DateTime<Utc>,
    pub checksum: String,
    pub size_bytes: u64,
    pub description: String,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArchiveManifest {
    snapshots: Vec<SnapshotMeta>,
    next_version: u64,
}

impl Default for ArchiveManifest {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            next_version: 1,
        }
    }
}

/// Directory of parameter snapshots plus their manifest
pub struct ParameterArchive {
    dir: PathBuf,
    manifest: ArchiveManifest,
}

fn checksum(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

impl ParameterArchive {
    /// Open the archive at `dir`, reading its manifest if one exists
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            let json = std::fs::read_to_string(&manifest_path)?;
            let manifest: ArchiveManifest = serde_json::from_str(&json)?;
            info!("Loaded archive manifest with {} snapshots", manifest.snapshots.len());
            manifest
        } else {
            ArchiveManifest::default()
        };
        Ok(Self { dir, manifest })
    }

    /// Write `manifest` to disk, then adopt it in memory
    fn commit_manifest(&mut self, manifest: ArchiveManifest) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(self.dir.join(MANIFEST_FILE), json)?;
        self.manifest = manifest;
        Ok(())
    }

    /// Serialize `data` into a new snapshot
    pub fn save<T: Serialize>(&mut self, data: &T, description: &str) -> Result<SnapshotMeta> {
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string(data)?;
        let version = self.manifest.next_version;
        let now = Utc::now();
        let filename = format!("params_v{:04}_{}.json", version, now.format("%Y%m%d_%H%M%S"));
        std::fs::write(self.dir.join(&filename), &json)?;

        let meta = SnapshotMeta {
            version,
            timestamp: now,
            checksum: checksum(json.as_bytes()),
            size_bytes: json.len() as u64,
            description: description.to_string(),
            filename,
        };
        let mut manifest = self.manifest.clone();
        manifest.snapshots.push(meta.clone());
        manifest.next_version += 1;
        if let Err(e) = self.commit_manifest(manifest) {
            let _ = std::fs::remove_file(self.dir.join(&meta.filename));
            return Err(e);
        }

        info!("Archived parameters v{}: {} ({} bytes)", version, description, json.len());
        Ok(meta)
    }

    /// Load snapshot `version`, verifying its checksum first
    pub fn load<T: DeserializeOwned>(&self, version: u64) -> Result<T> {
        let meta = self
            .manifest
            .snapshots
            .iter()
            .find(|s| s.version == version)
            .ok_or_else(|| DataError::lookup(format!("snapshot v{} not found", version)))?;

        let json = std::fs::read_to_string(self.dir.join(&meta.filename))?;
        let actual = checksum(json.as_bytes());
        if actual != meta.checksum {
            return Err(DataError::Integrity(format!(
                "checksum mismatch for v{}: expected {}, got {}",
                version, meta.checksum, actual
            )));
        }

        let data = serde_json::from_str(&json)?;
        info!("Loaded parameters v{}: {} bytes, checksum OK", version, json.len());
        Ok(data)
    }

    pub fn load_latest<T: DeserializeOwned>(&self) -> Result<T> {
        let latest = self
            .manifest
            .snapshots
            .last()
            .ok_or_else(|| DataError::lookup("archive has no snapshots"))?;
        self.load(latest.version)
    }

    pub fn snapshots(&self) -> &[SnapshotMeta] {
        &self.manifest.snapshots
    }

    /// Checksum status of every snapshot file
    pub fn verify_all(&self) -> Vec<(u64, bool)> {
        self.manifest
            .snapshots
            .iter()
            .map(|meta| {
                let ok = std::fs::read(self.dir.join(&meta.filename))
                    .map(|bytes| checksum(&bytes) == meta.checksum)
                    .unwrap_or(false);
                (meta.version, ok)
            })
            .collect()
    }

    /// Drop all but the newest `keep` snapshots
    pub fn retain_latest(&mut self, keep: usize) -> Result<usize> {
        if self.manifest.snapshots.len() <= keep {
            return Ok(0);
        }
        let remove_count = self.manifest.snapshots.len() - keep;
        let mut manifest = self.manifest.clone();
        let removed: Vec<SnapshotMeta> = manifest.snapshots.drain(..remove_count).collect();
        self.commit_manifest(manifest)?;
        for meta in &removed {
            let _ = std::fs::remove_file(self.dir.join(&meta.filename));
        }
        info!("Removed {} old snapshots, keeping latest {}", remove_count, keep);
        Ok(remove_count)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequences::SequenceStore;
    use crate::table::{ColumnData, UnitTable, UnitTag};
    use crate::units::registry::amino_acid;
    use nalgebra::DMatrix;
    use std::collections::HashMap;

    fn test_dir() -> PathBuf {
        std::env::temp_dir().join(format!("cellsim-archive-test-{}", uuid::Uuid::new_v4()))
    }

    fn table() -> UnitTable {
        UnitTable::new(
            vec![("length".to_string(), ColumnData::Int(vec![3, 1]))],
            HashMap::from([("length".to_string(), UnitTag::Unit(amino_acid()))]),
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = test_dir();
        let mut archive = ParameterArchive::open(&dir).unwrap();
        let meta = archive.save(&table(), "monomer lengths").unwrap();
        assert_eq!(meta.version, 1);

        let loaded: UnitTable = archive.load(1).unwrap();
        assert_eq!(loaded, table());

        let reopened = ParameterArchive::open(&dir).unwrap();
        assert_eq!(reopened.snapshots().len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_sequences_stored_compacted() {
        let dir = test_dir();
        let mut archive = ParameterArchive::open(&dir).unwrap();
        let padded = DMatrix::from_row_slice(2, 4, &[1, 2, -1, -1, 3, -1, -1, -1]);
        let store = SequenceStore::from_padded(padded);
        let meta = archive.save(&store, "sequences").unwrap();

        let raw = std::fs::read_to_string(dir.join(&meta.filename)).unwrap();
        assert_eq!(raw, r#"{"rows":[[1,2],[3]],"shape":[2,4]}"#);
        let loaded: SequenceStore = archive.load_latest().unwrap();
        assert_eq!(loaded, store);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_tampered_snapshot_rejected() {
        let dir = test_dir();
        let mut archive = ParameterArchive::open(&dir).unwrap();
        let meta = archive.save(&table(), "lengths").unwrap();
        std::fs::write(dir.join(&meta.filename), "{}").unwrap();

        assert!(matches!(archive.load::<UnitTable>(1), Err(DataError::Integrity(_))));
        assert_eq!(archive.verify_all(), vec![(1, false)]);
        assert!(matches!(archive.load::<UnitTable>(7), Err(DataError::Lookup(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_manifest_write_leaves_archive_unchanged() {
        let dir = test_dir();
        let mut archive = ParameterArchive::open(&dir).unwrap();
        archive.save(&table(), "lengths").unwrap();

        // a directory where the manifest file should be makes the write fail
        std::fs::remove_file(dir.join(MANIFEST_FILE)).unwrap();
        std::fs::create_dir(dir.join(MANIFEST_FILE)).unwrap();
        assert!(archive.save(&table(), "lengths again").is_err());
        assert_eq!(archive.snapshots().len(), 1);
        assert_eq!(archive.verify_all(), vec![(1, true)]);
        let files = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(files, 2);

        std::fs::remove_dir(dir.join(MANIFEST_FILE)).unwrap();
        let meta = archive.save(&table(), "retry").unwrap();
        assert_eq!(meta.version, 2);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_retain_latest() {
        let dir = test_dir();
        let mut archive = ParameterArchive::open(&dir).unwrap();
        for i in 0..4 {
            archive.save(&vec![i], &format!("v{}", i)).unwrap();
        }
        assert_eq!(archive.retain_latest(1).unwrap(), 3);
        assert_eq!(archive.snapshots().len(), 1);
        let latest: Vec<i32> = archive.load_latest().unwrap();
        assert_eq!(latest, vec![3]);
        assert_eq!(archive.verify_all(), vec![(4, true)]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_archive() {
        let archive = ParameterArchive::open(test_dir()).unwrap();
        assert!(archive.load_latest::<UnitTable>().is_err());
    }
}
