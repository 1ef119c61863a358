//! Portal persistence
//!
//! Saved portals come from several on-disk formats. Each format has its own
//! importer; all of them produce the same [`PortalRecord`]. Records are plain
//! data: turning one into a live [`Portal`] only needs the template registry
//! and never touches the world.

pub mod json_store;
pub mod legacy_importer;

pub use json_store::JsonPortalStore;
pub use legacy_importer::LegacyDbImporter;

use crate::error::EngineResult;
use crate::gate::{Facing, StructureInstance, TemplateRegistry};
use crate::portal::{Portal, PortalBehavior, PortalFlags};
use crate::world::core::VoxelPos;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("No importer for {0}")]
    UnsupportedFormat(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::IoError(err.to_string())
    }
}

/// Format-independent saved portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalRecord {
    pub name: String,
    pub network: String,
    pub owner: String,
    /// Template file name
    pub template: String,
    /// Top-left reference corner
    pub origin: VoxelPos,
    pub facing: Facing,
    pub sign: VoxelPos,
    #[serde(default)]
    pub button: Option<VoxelPos>,
    #[serde(default)]
    pub destination: Option<String>,
    /// Server of a remote destination
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub flags: PortalFlags,
}

impl PortalRecord {
    pub fn from_portal(portal: &Portal) -> Self {
        let structure = portal.structure();
        let (destination, server) = match &portal.behavior {
            PortalBehavior::Fixed { destination } => (Some(destination.clone()), None),
            PortalBehavior::LegacyRemote {
                server,
                destination,
            } => (Some(destination.clone()), Some(server.clone())),
            PortalBehavior::Networked { .. } | PortalBehavior::Random => (None, None),
        };
        Self {
            name: portal.name.clone(),
            network: portal.network.clone(),
            owner: portal.owner.clone(),
            template: structure.template().name.clone(),
            origin: structure.origin(),
            facing: structure.facing(),
            sign: portal.sign,
            button: portal.button,
            destination,
            server,
            flags: portal.flags,
        }
    }

    /// Behaviour implied by the flags and destination
    pub fn behavior(&self) -> PortalBehavior {
        let destination = self
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|destination| !destination.is_empty());
        match (self.flags.remote, self.flags.random, destination) {
            (true, _, Some(destination)) => PortalBehavior::LegacyRemote {
                server: self.server.clone().unwrap_or_default(),
                destination: destination.to_string(),
            },
            (_, true, _) => PortalBehavior::Random,
            (_, _, Some(destination)) => PortalBehavior::Fixed {
                destination: destination.to_string(),
            },
            _ => PortalBehavior::networked(),
        }
    }

    /// Live portal for this record. The structure is not verified here.
    pub fn into_portal(self, templates: &TemplateRegistry) -> EngineResult<Portal> {
        let template = templates.require(&self.template)?;
        let structure =
            StructureInstance::new(template, self.origin, self.facing, self.flags.backwards);
        let behavior = self.behavior();
        let mut portal = Portal::new(
            &self.name,
            &self.network,
            &self.owner,
            self.flags,
            behavior,
            structure,
        );
        portal.sign = self.sign;
        portal.button = self.button;
        Ok(portal)
    }
}

/// Records read from one source, plus what had to be skipped
#[derive(Debug, Default)]
pub struct ImportReport {
    pub records: Vec<PortalRecord>,
    /// (line, reason) for every skipped record
    pub skipped: Vec<(usize, String)>,
}

/// One saved-portal format
pub trait PortalImporter {
    /// Short format name for logs
    fn format_name(&self) -> &'static str;

    /// Whether `path` looks like this format
    fn can_import(&self, path: &Path) -> bool;

    fn import(&self, path: &Path) -> PersistenceResult<ImportReport>;
}

/// Import `path` with the first importer that accepts it
pub fn import_with(
    importers: &[&dyn PortalImporter],
    path: &Path,
) -> PersistenceResult<ImportReport> {
    let importer = importers
        .iter()
        .find(|importer| importer.can_import(path))
        .ok_or_else(|| PersistenceError::UnsupportedFormat(path.display().to_string()))?;
    let report = importer.import(path)?;
    log::info!(
        "[persistence::import_with] {} record(s) from {} ({}), {} skipped",
        report.records.len(),
        path.display(),
        importer.format_name(),
        report.skipped.len()
    );
    Ok(report)
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(extension))
}
