//! Template registry
//!
//! Loads every `*.gate` file in a folder once at startup and hands out shared
//! read-only layouts by file name. A bad template is rejected on its own with
//! a logged reason; the rest keep loading.

use super::error::reject;
use super::instance::StructureInstance;
use super::layout_data::{MaterialSpec, TemplateLayout};
use super::layout_operations::{parse_template, ParseOptions};
use super::transform::Facing;
use crate::constants::symbols::CONTROL;
use crate::constants::template_keys::TEMPLATE_EXTENSION;
use crate::error::{EngineError, EngineResult, OptionExt};
use crate::world::core::{BlockId, MaterialRegistry, VoxelPos};
use crate::world::interfaces::BlockAccess;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of loading a template folder
#[derive(Debug, Default)]
pub struct TemplateLoadReport {
    /// File names registered, in load order
    pub loaded: Vec<String>,
    /// File names rejected, with the reason
    pub rejected: Vec<(String, EngineError)>,
    /// Files rewritten to their canonical form
    pub rewritten: Vec<String>,
}

/// Templates by file name
#[derive(Default)]
pub struct TemplateRegistry {
    templates: FxHashMap<String, Arc<TemplateLayout>>,
    options: ParseOptions,
}

impl TemplateRegistry {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            templates: FxHashMap::default(),
            options,
        }
    }

    /// Register an already parsed template, replacing one of the same name
    pub fn register(&mut self, layout: TemplateLayout) -> Arc<TemplateLayout> {
        let layout = Arc::new(layout);
        if self
            .templates
            .insert(layout.name.clone(), Arc::clone(&layout))
            .is_some()
        {
            log::warn!(
                "[TemplateRegistry::register] Replaced template {}",
                layout.name
            );
        }
        layout
    }

    /// Parse and register template text
    pub fn load_str(
        &mut self,
        name: &str,
        text: &str,
        materials: &MaterialRegistry,
    ) -> EngineResult<Arc<TemplateLayout>> {
        let layout =
            parse_template(name, text, materials, self.options).map_err(|err| reject(name, err))?;
        Ok(self.register(layout))
    }

    /// Load every template file in `folder`.
    ///
    /// A missing folder is created and yields an empty report. With
    /// `rewrite`, files whose text differs from the canonical form are
    /// written back.
    pub fn load_directory(
        &mut self,
        folder: &Path,
        materials: &MaterialRegistry,
        rewrite: bool,
    ) -> EngineResult<TemplateLoadReport> {
        let mut report = TemplateLoadReport::default();
        if !folder.exists() {
            fs::create_dir_all(folder).map_err(|err| io_error(folder, err))?;
            log::info!(
                "[TemplateRegistry::load_directory] Created empty template folder {}",
                folder.display()
            );
            return Ok(report);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(folder)
            .map_err(|err| io_error(folder, err))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file() && is_template_file(path))
            .collect();
        paths.sort();

        for path in paths {
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .to_string();

            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    log::warn!(
                        "[TemplateRegistry::load_directory] Could not read {}: {}",
                        path.display(),
                        err
                    );
                    report.rejected.push((name, io_error(&path, err)));
                    continue;
                }
            };

            match self.load_str(&name, &text, materials) {
                Ok(layout) => {
                    if rewrite {
                        let canonical = layout.to_template_text(materials);
                        if canonical != text {
                            match fs::write(&path, canonical) {
                                Ok(()) => report.rewritten.push(name.clone()),
                                Err(err) => log::warn!(
                                    "[TemplateRegistry::load_directory] Could not rewrite {}: {}",
                                    path.display(),
                                    err
                                ),
                            }
                        }
                    }
                    report.loaded.push(name);
                }
                Err(err) => {
                    log::warn!("[TemplateRegistry::load_directory] {}", err);
                    report.rejected.push((name, err));
                }
            }
        }

        log::info!(
            "[TemplateRegistry::load_directory] Loaded {} template(s) from {}, rejected {}",
            report.loaded.len(),
            folder.display(),
            report.rejected.len()
        );
        Ok(report)
    }

    pub fn get(&self, name: &str) -> Option<Arc<TemplateLayout>> {
        self.templates.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> EngineResult<Arc<TemplateLayout>> {
        self.get(name).ok_or_engine(|| EngineError::TemplateNotFound {
            name: name.to_string(),
        })
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<TemplateLayout>> {
        self.templates.remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates whose control cells may be made of `material`, by name
    pub fn templates_with_control_material(&self, material: BlockId) -> Vec<Arc<TemplateLayout>> {
        let mut found: Vec<Arc<TemplateLayout>> = self
            .templates
            .values()
            .filter(|layout| match layout.material_for(CONTROL) {
                Some(MaterialSpec::Unmapped) | None => true,
                Some(spec) => spec.accepts(material),
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// First structure that has a control cell at `control` and matches the
    /// world, trying templates by name and each of their control cells
    pub fn find_structure(
        &self,
        world: &impl BlockAccess,
        control: VoxelPos,
        facing: Facing,
        backwards: bool,
        on_create: bool,
    ) -> Option<StructureInstance> {
        let material = world.material_at(control);
        for layout in self.templates_with_control_material(material) {
            for mut candidate in
                StructureInstance::candidates_at_control(&layout, control, facing, backwards)
            {
                if candidate.verify(world, on_create) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
}

fn io_error(path: &Path, err: std::io::Error) -> EngineError {
    EngineError::IoError {
        path: path.display().to_string(),
        error: err.to_string(),
    }
}
