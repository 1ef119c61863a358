//! Legacy `.db` portal importer
//!
//! One portal per line, colon separated:
//!
//! ```text
//! name:sign:button:modX:modZ:rotX:topLeft:gate:destination:network:owner:flags
//! ```
//!
//! Positions are `x,y,z`. Older files stop after `gate` or after any later
//! field; missing fields take defaults. `flags` is a string of flag letters.

use super::{
    has_extension, ImportReport, PersistenceError, PersistenceResult, PortalImporter, PortalRecord,
};
use crate::gate::Facing;
use crate::portal::PortalFlags;
use crate::world::core::VoxelPos;
use std::fs;
use std::path::Path;

const SEPARATOR: char = ':';
const MIN_FIELDS: usize = 8;

/// Importer for the colon-separated legacy save format
#[derive(Debug, Clone)]
pub struct LegacyDbImporter {
    /// Network for records that name none
    default_network: String,
}

impl LegacyDbImporter {
    pub fn new(default_network: &str) -> Self {
        Self {
            default_network: default_network.to_string(),
        }
    }

    /// Parse the text of a whole file; bad lines are skipped and reported
    pub fn parse_text(&self, text: &str) -> ImportReport {
        let mut report = ImportReport::default();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.parse_line(line, index + 1) {
                Ok(record) => report.records.push(record),
                Err(err) => {
                    log::warn!("[LegacyDbImporter::parse_text] Skipping record: {}", err);
                    report.skipped.push((index + 1, err.to_string()));
                }
            }
        }
        report
    }

    /// Parse one record line
    pub fn parse_line(&self, line: &str, number: usize) -> PersistenceResult<PortalRecord> {
        let malformed = |reason: String| PersistenceError::MalformedRecord {
            line: number,
            reason,
        };
        let fields: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
        if fields.len() < MIN_FIELDS {
            return Err(malformed(format!(
                "expected at least {} fields, found {}",
                MIN_FIELDS,
                fields.len()
            )));
        }
        let field = |index: usize| fields.get(index).copied().unwrap_or("");

        let name = field(0);
        if name.is_empty() {
            return Err(malformed("empty portal name".to_string()));
        }
        let sign = parse_position(field(1)).map_err(&malformed)?;
        let button = match field(2) {
            "" => None,
            text => Some(parse_position(text).map_err(&malformed)?),
        };
        let mod_x = parse_int(field(3), "modX").map_err(&malformed)?;
        let mod_z = parse_int(field(4), "modZ").map_err(&malformed)?;
        let yaw: f32 = field(5)
            .parse()
            .map_err(|_| malformed(format!("invalid rotX '{}'", field(5))))?;
        let facing = Facing::from_yaw(yaw).map_err(|err| malformed(err.to_string()))?;
        let origin = parse_position(field(6)).map_err(&malformed)?;
        let template = field(7);
        if template.is_empty() {
            return Err(malformed("empty gate name".to_string()));
        }

        let right = facing.right_axis();
        if (mod_x, mod_z) != (right.x, right.z) {
            log::warn!(
                "[LegacyDbImporter::parse_line] {}: modifiers ({}, {}) disagree with rotX {}, using rotX",
                name,
                mod_x,
                mod_z,
                yaw
            );
        }

        let network = match field(9) {
            "" => self.default_network.as_str(),
            network => network,
        };
        let destination = Some(field(8))
            .filter(|destination| !destination.is_empty())
            .map(str::to_string);

        Ok(PortalRecord {
            name: name.to_string(),
            network: network.to_string(),
            owner: field(10).to_string(),
            template: template.to_string(),
            origin,
            facing,
            sign,
            button,
            destination,
            server: None,
            flags: PortalFlags::from_codes(field(11)),
        })
    }
}

impl PortalImporter for LegacyDbImporter {
    fn format_name(&self) -> &'static str {
        "legacy-db"
    }

    fn can_import(&self, path: &Path) -> bool {
        has_extension(path, "db")
    }

    fn import(&self, path: &Path) -> PersistenceResult<ImportReport> {
        let text = fs::read_to_string(path)?;
        Ok(self.parse_text(&text))
    }
}

fn parse_int(text: &str, what: &str) -> Result<i32, String> {
    text.parse()
        .map_err(|_| format!("invalid {} '{}'", what, text))
}

fn parse_position(text: &str) -> Result<VoxelPos, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x, y, z] => Ok(VoxelPos::new(
            parse_int(x, "x")?,
            parse_int(y, "y")?,
            parse_int(z, "z")?,
        )),
        _ => Err(format!("invalid position '{}'", text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FULL: &str = "Spawn:10,65,4:12,65,4:-1:0:180:9,67,4:nethergate.gate:Market:central:alice:hb";

    #[test]
    fn test_full_line() {
        let importer = LegacyDbImporter::new("default");
        let record = importer.parse_line(FULL, 1).expect("valid line");
        assert_eq!(record.name, "Spawn");
        assert_eq!(record.sign, VoxelPos::new(10, 65, 4));
        assert_eq!(record.button, Some(VoxelPos::new(12, 65, 4)));
        assert_eq!(record.facing, Facing::North);
        assert_eq!(record.origin, VoxelPos::new(9, 67, 4));
        assert_eq!(record.template, "nethergate.gate");
        assert_eq!(record.destination.as_deref(), Some("Market"));
        assert_eq!(record.network, "central");
        assert_eq!(record.owner, "alice");
        assert!(record.flags.hidden && record.flags.backwards);
    }

    #[test]
    fn test_short_line_takes_defaults() {
        let importer = LegacyDbImporter::new("default");
        let record = importer
            .parse_line("Old:0,64,0::0:1:90:0,66,1:classic.gate", 3)
            .expect("valid line");
        assert_eq!(record.button, None);
        assert_eq!(record.facing, Facing::West);
        assert_eq!(record.network, "default");
        assert_eq!(record.destination, None);
        assert_eq!(record.flags, PortalFlags::default());
    }

    #[test]
    fn test_bad_lines_skipped() {
        let importer = LegacyDbImporter::new("default");
        let text = format!(
            "# saved portals\n{}\nBroken:1,2\nTilted:0,64,0::1:0:45:0,66,0:g.gate\n\n",
            FULL
        );
        let report = importer.parse_text(&text);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].0, 3);
        assert_eq!(report.skipped[1].0, 4);
    }

    #[test]
    fn test_import_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("world.db");
        fs::write(&path, FULL).expect("write");

        let importer = LegacyDbImporter::new("default");
        assert!(importer.can_import(&path));
        assert!(!importer.can_import(&dir.path().join("portals.json")));
        let report = importer.import(&path).expect("readable");
        assert_eq!(report.records.len(), 1);
    }
}
