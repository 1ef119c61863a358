//! Startup context
//!
//! Everything the host needs after startup, built once and passed around by
//! reference: configuration, materials, templates and portal networks. The
//! gate engine itself only ever sees a template and a world.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, OptionExt};
use crate::gate::{
    ExitResult, Facing, Occupant, StructureInstance, TemplateLoadReport, TemplateRegistry,
};
use crate::persistence::{
    import_with, JsonPortalStore, LegacyDbImporter, PortalImporter, PortalRecord,
};
use crate::portal::{NetworkRegistry, Portal};
use crate::world::core::{MaterialRegistry, VoxelPos};
use crate::world::interfaces::BlockAccess;
use parking_lot::RwLock;
use std::fs;

/// Explicit engine state, replacing process-wide singletons
pub struct StargateContext {
    pub config: EngineConfig,
    pub materials: MaterialRegistry,
    pub templates: TemplateRegistry,
    pub networks: RwLock<NetworkRegistry>,
    /// Outcome of the startup template load
    pub template_report: TemplateLoadReport,
}

impl StargateContext {
    /// Validate the config, load templates, then load saved portals.
    /// Portals whose template is missing are skipped with a warning.
    pub fn initialize(config: EngineConfig) -> EngineResult<Self> {
        config.validate().map_err(|err| EngineError::InvalidConfig {
            field: "config".to_string(),
            value: String::new(),
            reason: err.to_string(),
        })?;

        let materials = MaterialRegistry::new();
        let mut templates = TemplateRegistry::new(config.parse_options());
        let template_report =
            templates.load_directory(&config.gate_folder, &materials, config.rewrite_templates)?;

        let context = Self {
            config,
            materials,
            templates,
            networks: RwLock::new(NetworkRegistry::new()),
            template_report,
        };
        let records = context.read_saved_portals()?;
        let added = context.register_records(records);
        log::info!(
            "[StargateContext::initialize] {} template(s), {} portal(s) ready",
            context.templates.len(),
            added
        );
        Ok(context)
    }

    /// Records from the JSON store plus any legacy `.db` files in the
    /// portal folder
    fn read_saved_portals(&self) -> EngineResult<Vec<PortalRecord>> {
        let folder = &self.config.portal_folder;
        let store = JsonPortalStore::in_folder(folder);
        let mut records = store.load()?;

        if folder.is_dir() {
            let legacy = LegacyDbImporter::new(&self.config.default_network);
            let importers: [&dyn PortalImporter; 1] = [&legacy];
            let mut paths: Vec<_> = fs::read_dir(folder)?
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| legacy.can_import(path))
                .collect();
            paths.sort();
            for path in paths {
                records.extend(import_with(&importers, &path)?.records);
            }
        }
        Ok(records)
    }

    /// Register records as portals; returns how many were added
    pub fn register_records(&self, records: Vec<PortalRecord>) -> usize {
        let mut networks = self.networks.write();
        let mut added = 0;
        for record in records {
            let name = record.name.clone();
            match record
                .into_portal(&self.templates)
                .and_then(|portal| networks.add(portal))
            {
                Ok(()) => added += 1,
                Err(err) => log::warn!(
                    "[StargateContext::register_records] Skipping portal {}: {}",
                    name,
                    err
                ),
            }
        }
        added
    }

    /// Write every portal to the JSON store
    pub fn save_portals(&self) -> EngineResult<()> {
        let records: Vec<PortalRecord> = self
            .networks
            .read()
            .portals()
            .map(PortalRecord::from_portal)
            .collect();
        JsonPortalStore::in_folder(&self.config.portal_folder).save(&records)?;
        Ok(())
    }

    /// Structure with a control cell at `control`, if any template matches
    pub fn detect_structure(
        &self,
        world: &impl BlockAccess,
        control: VoxelPos,
        facing: Facing,
        backwards: bool,
    ) -> Option<StructureInstance> {
        self.templates.find_structure(world, control, facing, backwards, true)
    }

    pub fn add_portal(&self, portal: Portal) -> EngineResult<()> {
        self.networks.write().add(portal)
    }

    /// Exit location for leaving through portal `name`
    pub fn exit_for(
        &self,
        network: &str,
        name: &str,
        occupant: Occupant,
        world: &impl BlockAccess,
    ) -> EngineResult<ExitResult> {
        let networks = self.networks.read();
        let portal = networks
            .get(network, name)
            .ok_or_engine(|| EngineError::PortalNotFound {
                network: network.to_string(),
                name: name.to_string(),
            })?;
        Ok(portal.exit(occupant, world, &self.materials))
    }
}
