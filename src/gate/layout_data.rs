//! Template Layout Data - Pure DOP Structures
//!
//! The parsed form of a gate template: the symbol grid, per-symbol material
//! specs, portal-state materials and economy keys. Parsing, derivation and
//! the canonical writer live in `layout_operations`.

use super::vector::RelativeVector;
use crate::config::EconomyDefaults;
use crate::world::core::BlockId;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Acceptable materials for one template symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialSpec {
    /// One or more concrete block types; any of them matches
    Materials(Vec<BlockId>),
    /// Any member of a registry tag
    Tag {
        name: String,
        members: FxHashSet<BlockId>,
    },
    /// Matches anything
    Any,
    /// No mapping in the template. The first block seen for the symbol
    /// during a match call becomes the requirement for the rest of that call.
    Unmapped,
}

impl MaterialSpec {
    pub fn single(id: BlockId) -> Self {
        MaterialSpec::Materials(vec![id])
    }

    /// Whether `id` satisfies the spec. `Unmapped` is decided by the matcher.
    pub fn accepts(&self, id: BlockId) -> bool {
        match self {
            MaterialSpec::Materials(ids) => ids.contains(&id),
            MaterialSpec::Tag { members, .. } => members.contains(&id),
            MaterialSpec::Any => true,
            MaterialSpec::Unmapped => false,
        }
    }
}

/// Key-value section of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    pub portal_open: BlockId,
    pub portal_closed: BlockId,
    pub button: BlockId,
    pub use_cost: Option<i32>,
    pub create_cost: Option<i32>,
    pub destroy_cost: Option<i32>,
    pub to_owner: Option<bool>,
}

impl TemplateConfig {
    pub fn use_cost(&self, defaults: &EconomyDefaults) -> i32 {
        self.use_cost.unwrap_or(defaults.use_cost)
    }

    pub fn create_cost(&self, defaults: &EconomyDefaults) -> i32 {
        self.create_cost.unwrap_or(defaults.create_cost)
    }

    pub fn destroy_cost(&self, defaults: &EconomyDefaults) -> i32 {
        self.destroy_cost.unwrap_or(defaults.destroy_cost)
    }

    pub fn to_owner(&self, defaults: &EconomyDefaults) -> bool {
        self.to_owner.unwrap_or(defaults.to_owner)
    }

    /// Whether `id` is one of the two portal-state materials
    pub fn is_portal_state(&self, id: BlockId) -> bool {
        id == self.portal_open || id == self.portal_closed
    }
}

/// Cell sets derived from the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedCells {
    /// Frame blocks, control cells included
    pub border: Vec<RelativeVector>,
    /// Every opening cell, exit cells included
    pub entrances: Vec<RelativeVector>,
    /// Lowest opening cell of each column, left to right
    pub exits: Vec<RelativeVector>,
    /// Sign and button cells
    pub controls: Vec<RelativeVector>,
    /// Landing reference: the exit-marked cell, else the middle of `exits`
    pub exit: Option<RelativeVector>,
}

/// Parsed gate template
///
/// Immutable after load and shared by every structure built from it.
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    /// File name the template was loaded from
    pub name: String,
    /// Rows of symbols, right-padded with the ignore symbol
    pub(crate) grid: Vec<Vec<char>>,
    /// Material per non-reserved symbol, plus the control symbol
    pub(crate) materials: BTreeMap<char, MaterialSpec>,
    pub config: TemplateConfig,
    pub(crate) derived: OnceLock<DerivedCells>,
}

impl PartialEq for TemplateLayout {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
            && self.materials == other.materials
            && self.config == other.config
    }
}

impl Eq for TemplateLayout {}
