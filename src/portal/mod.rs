//! Portals: a matched structure plus its name, network and destination logic
//!
//! Destination selection is a closed set of behaviours. Each exposes the same
//! small surface: the current destination, stepping the selection, and the
//! sign text.

pub mod network;

pub use network::NetworkRegistry;

use crate::gate::{ExitQuery, ExitResult, Occupant, StructureInstance};
use crate::world::core::{MaterialRegistry, VoxelPos};
use crate::world::interfaces::BlockAccess;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-portal switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalFlags {
    /// Not listed as a destination
    pub hidden: bool,
    /// Stays open without being activated
    pub always_on: bool,
    /// Only the owner may use it
    pub private: bool,
    /// No use cost
    pub free: bool,
    /// Occupants leave through the back face
    pub backwards: bool,
    /// Listed even when fixed
    pub show: bool,
    /// Sign does not show the network
    pub no_network: bool,
    /// Destination picked at random on each use
    pub random: bool,
    /// Destination lives on another server
    pub remote: bool,
}

impl PortalFlags {
    /// Legacy single-letter flag codes, in save order
    pub const CODES: [char; 9] = ['h', 'a', 'p', 'f', 'b', 's', 'n', 'r', 'u'];

    /// Parse legacy flag letters; unknown letters are ignored
    pub fn from_codes(codes: &str) -> Self {
        let mut flags = PortalFlags::default();
        for letter in codes.chars() {
            match letter.to_ascii_lowercase() {
                'h' => flags.hidden = true,
                'a' => flags.always_on = true,
                'p' => flags.private = true,
                'f' => flags.free = true,
                'b' => flags.backwards = true,
                's' => flags.show = true,
                'n' => flags.no_network = true,
                'r' => flags.random = true,
                'u' => flags.remote = true,
                _ => {}
            }
        }
        flags
    }

    pub fn to_codes(&self) -> String {
        let set = [
            self.hidden,
            self.always_on,
            self.private,
            self.free,
            self.backwards,
            self.show,
            self.no_network,
            self.random,
            self.remote,
        ];
        Self::CODES
            .iter()
            .zip(set)
            .filter(|(_, on)| *on)
            .map(|(code, _)| *code)
            .collect()
    }
}

/// How a portal chooses where it sends occupants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortalBehavior {
    /// Always the same destination on the same network
    Fixed { destination: String },
    /// Cycles through the network's destinations from the sign
    Networked {
        /// Snapshot of the destinations at the last selection step
        destinations: Vec<String>,
        selected: Option<usize>,
    },
    /// Any visible destination, picked on use
    Random,
    /// Fixed destination on another server
    LegacyRemote { server: String, destination: String },
}

impl PortalBehavior {
    pub fn networked() -> Self {
        PortalBehavior::Networked {
            destinations: Vec::new(),
            selected: None,
        }
    }

    /// Destination the next use goes to, if already known
    pub fn current_destination(&self) -> Option<&str> {
        match self {
            PortalBehavior::Fixed { destination } => Some(destination.as_str()),
            PortalBehavior::Networked {
                destinations,
                selected,
            } => selected
                .and_then(|index| destinations.get(index))
                .map(String::as_str),
            PortalBehavior::Random => None,
            PortalBehavior::LegacyRemote { destination, .. } => Some(destination.as_str()),
        }
    }

    /// Step the selection by `step` through `destinations`, wrapping.
    /// Only networked portals have a selection; the others ignore this.
    pub fn advance_selection(&mut self, step: i32, available: &[String]) {
        let PortalBehavior::Networked {
            destinations,
            selected,
        } = self
        else {
            return;
        };

        let current = selected
            .and_then(|index| destinations.get(index))
            .and_then(|name| available.iter().position(|other| other == name));
        *destinations = available.to_vec();

        if available.is_empty() {
            *selected = None;
            return;
        }
        let count = available.len() as i64;
        let next = match current {
            Some(index) => (index as i64 + step as i64).rem_euclid(count),
            None if step < 0 => count - 1,
            None => 0,
        };
        *selected = Some(next as usize);
    }

    /// Pick a destination for a random portal
    pub fn pick_random<R: Rng + ?Sized>(available: &[String], rng: &mut R) -> Option<String> {
        available.choose(rng).cloned()
    }

    /// The three sign lines under the portal name
    pub fn sign_lines(&self) -> [String; 3] {
        match self {
            PortalBehavior::Fixed { destination } => {
                ["To:".to_string(), destination.clone(), String::new()]
            }
            PortalBehavior::Networked {
                destinations,
                selected,
            } => match selected.and_then(|index| Some((index, destinations.get(index)?))) {
                Some((index, current)) => {
                    let count = destinations.len();
                    let previous = if count > 2 {
                        destinations[(index + count - 1) % count].clone()
                    } else {
                        String::new()
                    };
                    let next = if count > 1 {
                        destinations[(index + 1) % count].clone()
                    } else {
                        String::new()
                    };
                    [previous, format!(">{}<", current), next]
                }
                _ => [String::new(), "Right click".to_string(), "to use gate".to_string()],
            },
            PortalBehavior::Random => ["> Random <".to_string(), String::new(), String::new()],
            PortalBehavior::LegacyRemote {
                server,
                destination,
            } => [
                "To:".to_string(),
                destination.clone(),
                format!("[{}]", server),
            ],
        }
    }
}

/// A named, owned portal built from one structure
#[derive(Debug, Clone)]
pub struct Portal {
    pub name: String,
    pub network: String,
    pub owner: String,
    pub flags: PortalFlags,
    pub behavior: PortalBehavior,
    pub sign: VoxelPos,
    pub button: Option<VoxelPos>,
    structure: StructureInstance,
}

impl Portal {
    pub fn new(
        name: &str,
        network: &str,
        owner: &str,
        flags: PortalFlags,
        behavior: PortalBehavior,
        structure: StructureInstance,
    ) -> Self {
        let controls = structure.control_positions();
        let sign = controls.first().copied().unwrap_or_else(|| structure.origin());
        let button = controls.get(1).copied();
        Self {
            name: name.to_string(),
            network: network.to_string(),
            owner: owner.to_string(),
            flags,
            behavior,
            sign,
            button,
            structure,
        }
    }

    pub fn structure(&self) -> &StructureInstance {
        &self.structure
    }

    /// Re-check the structure against the world
    pub fn verify(&mut self, world: &impl BlockAccess) -> bool {
        self.structure.verify(world, false)
    }

    /// Whether `position` is this portal's sign, button or a control cell
    pub fn owns_control(&self, position: VoxelPos) -> bool {
        self.sign == position
            || self.button == Some(position)
            || self.structure.is_control(position)
    }

    /// Where an occupant leaving through this portal lands
    pub fn exit(
        &self,
        occupant: Occupant,
        world: &impl BlockAccess,
        registry: &MaterialRegistry,
    ) -> ExitResult {
        let query = ExitQuery::new(&self.structure, occupant).with_backwards(self.flags.backwards);
        crate::gate::resolve(&query, world, registry)
    }

    /// All four sign lines
    pub fn sign_lines(&self) -> [String; 4] {
        let [first, second, third] = self.behavior.sign_lines();
        let third = if self.flags.no_network || !third.is_empty() {
            third
        } else {
            format!("({})", self.network)
        };
        [format!("-{}-", self.name), first, second, third]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_flag_codes_round_trip() {
        let flags = PortalFlags::from_codes("HbR");
        assert!(flags.hidden && flags.backwards && flags.random);
        assert!(!flags.private);
        assert_eq!(flags.to_codes(), "hbr");
        assert_eq!(PortalFlags::from_codes("xyz"), PortalFlags::default());
    }

    #[test]
    fn test_networked_selection_wraps() {
        let mut behavior = PortalBehavior::networked();
        assert_eq!(behavior.current_destination(), None);

        let available = names(&["alpha", "beta", "gamma"]);
        behavior.advance_selection(1, &available);
        assert_eq!(behavior.current_destination(), Some("alpha"));
        behavior.advance_selection(-1, &available);
        assert_eq!(behavior.current_destination(), Some("gamma"));
        behavior.advance_selection(2, &available);
        assert_eq!(behavior.current_destination(), Some("beta"));

        // selection follows its name when the list changes
        behavior.advance_selection(0, &names(&["beta", "delta"]));
        assert_eq!(behavior.current_destination(), Some("beta"));

        behavior.advance_selection(1, &[]);
        assert_eq!(behavior.current_destination(), None);
    }

    #[test]
    fn test_fixed_behaviours_ignore_selection() {
        let mut fixed = PortalBehavior::Fixed {
            destination: "home".to_string(),
        };
        fixed.advance_selection(1, &names(&["elsewhere"]));
        assert_eq!(fixed.current_destination(), Some("home"));

        let mut random = PortalBehavior::Random;
        random.advance_selection(1, &names(&["a"]));
        assert_eq!(random.current_destination(), None);
    }

    #[test]
    fn test_pick_random_stays_in_list() {
        let available = names(&["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = PortalBehavior::pick_random(&available, &mut rng).expect("non-empty");
            assert!(available.contains(&picked));
        }
        assert!(PortalBehavior::pick_random(&[], &mut rng).is_none());
    }

    #[test]
    fn test_sign_lines() {
        let mut behavior = PortalBehavior::networked();
        behavior.advance_selection(1, &names(&["a", "b", "c"]));
        assert_eq!(
            behavior.sign_lines(),
            ["c".to_string(), ">a<".to_string(), "b".to_string()]
        );

        let remote = PortalBehavior::LegacyRemote {
            server: "lobby".to_string(),
            destination: "spawn".to_string(),
        };
        assert_eq!(remote.sign_lines()[2], "[lobby]");
    }

    #[test]
    fn test_stale_selection_shows_idle_sign() {
        let behavior = PortalBehavior::Networked {
            destinations: names(&["a", "b"]),
            selected: Some(5),
        };
        assert_eq!(behavior.current_destination(), None);
        assert_eq!(
            behavior.sign_lines(),
            [
                String::new(),
                "Right click".to_string(),
                "to use gate".to_string()
            ]
        );
    }
}
