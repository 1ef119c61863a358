//! Structure matching
//!
//! Checks a structure instance against the world block by block. Frame cells
//! are compared with their symbol's material spec; opening cells must hold
//! one of the template's two portal-state materials.
//!
//! Symbols without a mapping are learned: the first block seen for such a
//! symbol becomes its requirement for the rest of the same call. The learned
//! table lives on the stack of one call and never reaches the template.

use super::instance::StructureInstance;
use super::layout_data::MaterialSpec;
use super::vector::RelativeVector;
use crate::world::core::BlockId;
use crate::world::interfaces::BlockAccess;
use rustc_hash::FxHashMap;

/// Whether every cell of the structure is satisfied.
///
/// `on_create` also lets openings hold air or water, for structures that
/// were just built and never activated.
pub fn matches(instance: &StructureInstance, world: &impl BlockAccess, on_create: bool) -> bool {
    scan(instance, world, on_create, true).is_empty()
}

/// Every cell that is not satisfied, frame cells first
pub fn mismatches(
    instance: &StructureInstance,
    world: &impl BlockAccess,
    on_create: bool,
) -> Vec<RelativeVector> {
    scan(instance, world, on_create, false)
}

fn scan(
    instance: &StructureInstance,
    world: &impl BlockAccess,
    on_create: bool,
    stop_at_first: bool,
) -> Vec<RelativeVector> {
    let layout = instance.template();
    let mut learned: FxHashMap<char, BlockId> = FxHashMap::default();
    let mut failed = Vec::new();

    for &cell in layout.border() {
        let Some(symbol) = layout.symbol_at(cell) else {
            continue;
        };
        let found = world.material_at(instance.absolute(cell));
        let satisfied = match layout.material_for(symbol) {
            Some(MaterialSpec::Unmapped) | None => *learned.entry(symbol).or_insert(found) == found,
            Some(spec) => spec.accepts(found),
        };
        if !satisfied {
            failed.push(cell);
            if stop_at_first {
                return failed;
            }
        }
    }

    for &cell in layout.entrances() {
        let found = world.material_at(instance.absolute(cell));
        let satisfied = layout.config.is_portal_state(found)
            || (on_create && (found == BlockId::AIR || found == BlockId::WATER));
        if !satisfied {
            failed.push(cell);
            if stop_at_first {
                return failed;
            }
        }
    }

    if !learned.is_empty() {
        log::trace!(
            "[matcher::scan] {} learned {} symbol(s) this call",
            layout.name,
            learned.len()
        );
    }
    failed
}
