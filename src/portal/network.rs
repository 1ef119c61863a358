//! Portal networks
//!
//! Portals grouped by network name. Network and portal names compare
//! case-insensitively; the portal keeps its display spelling.

use super::{Portal, PortalBehavior};
use crate::error::{EngineError, EngineResult, OptionExt};
use crate::world::core::VoxelPos;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// All portals, by network then name
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    networks: FxHashMap<String, BTreeMap<String, Portal>>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, portal: Portal) -> EngineResult<()> {
        let network = self.networks.entry(key(&portal.network)).or_default();
        let name = key(&portal.name);
        if network.contains_key(&name) {
            return Err(EngineError::DuplicatePortal {
                network: portal.network,
                name: portal.name,
            });
        }
        log::debug!(
            "[NetworkRegistry::add] {} joined network {}",
            portal.name,
            portal.network
        );
        network.insert(name, portal);
        Ok(())
    }

    pub fn remove(&mut self, network: &str, name: &str) -> EngineResult<Portal> {
        let network_key = key(network);
        let portals = self
            .networks
            .get_mut(&network_key)
            .ok_or_engine(|| not_found(network, name))?;
        let portal = portals
            .remove(&key(name))
            .ok_or_engine(|| not_found(network, name))?;
        if portals.is_empty() {
            self.networks.remove(&network_key);
        }
        Ok(portal)
    }

    pub fn get(&self, network: &str, name: &str) -> Option<&Portal> {
        self.networks.get(&key(network))?.get(&key(name))
    }

    pub fn get_mut(&mut self, network: &str, name: &str) -> Option<&mut Portal> {
        self.networks.get_mut(&key(network))?.get_mut(&key(name))
    }

    /// Network names, sorted
    pub fn networks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .networks
            .values()
            .filter_map(|portals| portals.values().next())
            .map(|portal| portal.network.as_str())
            .collect();
        names.sort_unstable_by_key(|name| name.to_lowercase());
        names
    }

    pub fn portals(&self) -> impl Iterator<Item = &Portal> {
        self.networks.values().flat_map(|portals| portals.values())
    }

    pub fn portal_count(&self) -> usize {
        self.networks.values().map(BTreeMap::len).sum()
    }

    /// Portals on `network` that `name` can dial: everything except itself
    /// and hidden portals, in name order
    pub fn destinations_for(&self, network: &str, name: &str) -> Vec<String> {
        let own = key(name);
        self.networks
            .get(&key(network))
            .map(|portals| {
                portals
                    .iter()
                    .filter(|(portal_key, portal)| **portal_key != own && !portal.flags.hidden)
                    .map(|(_, portal)| portal.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Step a portal's selection and return the new destination
    pub fn cycle_destination(
        &mut self,
        network: &str,
        name: &str,
        step: i32,
    ) -> EngineResult<Option<String>> {
        let available = self.destinations_for(network, name);
        let portal = self
            .get_mut(network, name)
            .ok_or_else(|| not_found(network, name))?;
        portal.behavior.advance_selection(step, &available);
        Ok(portal.behavior.current_destination().map(str::to_string))
    }

    /// Portal an occupant of `name` would arrive at now. Random portals
    /// draw from `rng`; remote destinations are not local and give `None`.
    pub fn resolve_destination<R: Rng + ?Sized>(
        &self,
        network: &str,
        name: &str,
        rng: &mut R,
    ) -> EngineResult<Option<&Portal>> {
        let portal = self
            .get(network, name)
            .ok_or_else(|| not_found(network, name))?;
        let destination = match &portal.behavior {
            PortalBehavior::Random => {
                PortalBehavior::pick_random(&self.destinations_for(network, name), rng)
            }
            PortalBehavior::LegacyRemote { .. } => None,
            behavior => behavior.current_destination().map(str::to_string),
        };
        Ok(destination.and_then(|destination| self.get(network, &destination)))
    }

    /// Portal whose sign, button or control cell is at `position`
    pub fn find_by_control(&self, position: VoxelPos) -> Option<&Portal> {
        self.portals().find(|portal| portal.owns_control(position))
    }
}

fn not_found(network: &str, name: &str) -> EngineError {
    EngineError::PortalNotFound {
        network: network.to_string(),
        name: name.to_string(),
    }
}
