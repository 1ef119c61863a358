//! Current portal save format
//!
//! A JSON document with a format version and the list of records. Saving
//! writes a temporary file next to the target and renames it over the
//! target, so a crash mid-save leaves the previous file intact.

use super::{
    has_extension, ImportReport, PersistenceError, PersistenceResult, PortalImporter, PortalRecord,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Version written by this store
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PortalDocument {
    version: u32,
    portals: Vec<PortalRecord>,
}

/// JSON portal file
#[derive(Debug, Clone)]
pub struct JsonPortalStore {
    path: PathBuf,
}

impl JsonPortalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file inside a portal folder
    pub fn in_folder(folder: &Path) -> Self {
        Self::new(folder.join("portals.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records; a missing file holds none
    pub fn load(&self) -> PersistenceResult<Vec<PortalRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Self::from_json(&text)
    }

    /// Write all records, replacing the file
    pub fn save(&self, records: &[PortalRecord]) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = Self::to_json(records)?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, text)?;
        fs::rename(&temp, &self.path)?;
        log::info!(
            "[JsonPortalStore::save] Saved {} portal(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn to_json(records: &[PortalRecord]) -> PersistenceResult<String> {
        let document = PortalDocument {
            version: FORMAT_VERSION,
            portals: records.to_vec(),
        };
        serde_json::to_string_pretty(&document)
            .map_err(|err| PersistenceError::SerializationError(err.to_string()))
    }

    pub fn from_json(text: &str) -> PersistenceResult<Vec<PortalRecord>> {
        let document: PortalDocument = serde_json::from_str(text)
            .map_err(|err| PersistenceError::DeserializationError(err.to_string()))?;
        if document.version != FORMAT_VERSION {
            return Err(PersistenceError::VersionMismatch {
                expected: FORMAT_VERSION.to_string(),
                found: document.version.to_string(),
            });
        }
        Ok(document.portals)
    }
}

impl PortalImporter for JsonPortalStore {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn can_import(&self, path: &Path) -> bool {
        has_extension(path, "json")
    }

    fn import(&self, path: &Path) -> PersistenceResult<ImportReport> {
        let records = JsonPortalStore::new(path).load()?;
        Ok(ImportReport {
            records,
            skipped: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Facing;
    use crate::persistence::{import_with, LegacyDbImporter};
    use crate::portal::PortalFlags;
    use crate::world::core::VoxelPos;
    use tempfile::tempdir;

    fn record(name: &str) -> PortalRecord {
        PortalRecord {
            name: name.to_string(),
            network: "central".to_string(),
            owner: "bob".to_string(),
            template: "nethergate.gate".to_string(),
            origin: VoxelPos::new(4, 70, -2),
            facing: Facing::East,
            sign: VoxelPos::new(5, 68, -2),
            button: Some(VoxelPos::new(5, 68, -5)),
            destination: Some("Spawn".to_string()),
            server: None,
            flags: PortalFlags {
                free: true,
                ..PortalFlags::default()
            },
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("temp dir");
        let store = JsonPortalStore::in_folder(&dir.path().join("portals"));
        assert!(store.load().expect("missing file").is_empty());

        let records = vec![record("A"), record("B")];
        store.save(&records).expect("saved");
        assert_eq!(store.load().expect("loaded"), records);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_version_mismatch() {
        let text = "{\"version\": 99, \"portals\": []}";
        assert!(matches!(
            JsonPortalStore::from_json(text),
            Err(PersistenceError::VersionMismatch { .. })
        ));
        assert!(matches!(
            JsonPortalStore::from_json("not json"),
            Err(PersistenceError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_importers_agree() {
        let dir = tempdir().expect("temp dir");
        let legacy_path = dir.path().join("old.db");
        fs::write(
            &legacy_path,
            "A:5,68,-2:5,68,-5:0:-1:270:4,70,-2:nethergate.gate:Spawn:central:bob:f\n",
        )
        .expect("write");
        let json = JsonPortalStore::new(dir.path().join("portals.json"));
        json.save(&[record("A")]).expect("saved");

        let legacy = LegacyDbImporter::new("central");
        let importers: [&dyn PortalImporter; 2] = [&legacy, &json];
        let from_legacy = import_with(&importers, &legacy_path).expect("legacy import");
        let from_json = import_with(&importers, json.path()).expect("json import");
        assert_eq!(from_legacy.records, from_json.records);
    }
}
