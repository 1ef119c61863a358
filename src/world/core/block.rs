use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl Default for BlockId {
    fn default() -> Self {
        BlockId::AIR
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display block name if it's a known block
        match *self {
            BlockId::AIR => write!(f, "Air"),
            BlockId::WATER => write!(f, "Water"),
            BlockId::LAVA => write!(f, "Lava"),
            BlockId::STONE => write!(f, "Stone"),
            BlockId::DIRT => write!(f, "Dirt"),
            BlockId::GRASS_BLOCK => write!(f, "Grass Block"),
            BlockId::COBBLESTONE => write!(f, "Cobblestone"),
            BlockId::OBSIDIAN => write!(f, "Obsidian"),
            BlockId::CRYING_OBSIDIAN => write!(f, "Crying Obsidian"),
            BlockId::NETHER_PORTAL => write!(f, "Nether Portal"),
            BlockId::END_GATEWAY => write!(f, "End Gateway"),
            BlockId::GLOWSTONE => write!(f, "Glowstone"),
            BlockId::STONE_BUTTON => write!(f, "Stone Button"),
            BlockId::OAK_BUTTON => write!(f, "Oak Button"),
            BlockId::STONE_SLAB => write!(f, "Stone Slab"),
            BlockId::OAK_SLAB => write!(f, "Oak Slab"),
            BlockId::OAK_STAIRS => write!(f, "Oak Stairs"),
            BlockId::WHITE_WOOL => write!(f, "White Wool"),
            BlockId::RED_WOOL => write!(f, "Red Wool"),
            BlockId::BLUE_WOOL => write!(f, "Blue Wool"),
            BlockId::OAK_SIGN => write!(f, "Oak Sign"),
            BlockId::TALL_GRASS => write!(f, "Tall Grass"),
            BlockId::BEDROCK => write!(f, "Bedrock"),
            _ => write!(f, "Block({})", self.0),
        }
    }
}

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const WATER: BlockId = BlockId(1);
    pub const LAVA: BlockId = BlockId(2);
    pub const STONE: BlockId = BlockId(3);
    pub const DIRT: BlockId = BlockId(4);
    pub const GRASS_BLOCK: BlockId = BlockId(5);
    pub const COBBLESTONE: BlockId = BlockId(6);
    pub const OBSIDIAN: BlockId = BlockId(7);
    pub const CRYING_OBSIDIAN: BlockId = BlockId(8);
    pub const NETHER_PORTAL: BlockId = BlockId(9);
    pub const END_GATEWAY: BlockId = BlockId(10);
    pub const GLOWSTONE: BlockId = BlockId(11);
    pub const STONE_BUTTON: BlockId = BlockId(12);
    pub const OAK_BUTTON: BlockId = BlockId(13);
    pub const STONE_SLAB: BlockId = BlockId(14);
    pub const OAK_SLAB: BlockId = BlockId(15);
    pub const OAK_STAIRS: BlockId = BlockId(16);
    pub const WHITE_WOOL: BlockId = BlockId(17);
    pub const RED_WOOL: BlockId = BlockId(18);
    pub const BLUE_WOOL: BlockId = BlockId(19);
    pub const OAK_SIGN: BlockId = BlockId(20);
    pub const TALL_GRASS: BlockId = BlockId(21);
    pub const BEDROCK: BlockId = BlockId(22);

    /// Create a new BlockId from a raw u16 value
    pub const fn new(id: u16) -> Self {
        BlockId(id)
    }
}

/// Which half of a two-part block (slab, stairs, door) occupies a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockHalf {
    /// Full block, or a block with no halves
    #[default]
    Whole,
    Bottom,
    Top,
}

/// Block type plus the bit of state the exit resolver needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockState {
    pub id: BlockId,
    pub half: BlockHalf,
}

impl BlockState {
    pub const AIR: BlockState = BlockState {
        id: BlockId::AIR,
        half: BlockHalf::Whole,
    };

    pub const fn of(id: BlockId) -> Self {
        BlockState {
            id,
            half: BlockHalf::Whole,
        }
    }

    pub const fn with_half(id: BlockId, half: BlockHalf) -> Self {
        BlockState { id, half }
    }

    pub fn is_bottom_half(&self) -> bool {
        self.half == BlockHalf::Bottom
    }
}

impl From<BlockId> for BlockState {
    fn from(id: BlockId) -> Self {
        BlockState::of(id)
    }
}

/// Physical properties of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsProperties {
    /// Occupants suffocate inside and can stand on top
    pub solid: bool,
    pub liquid: bool,
    /// Can be pressed to activate something (buttons)
    pub interactive: bool,
}

impl PhysicsProperties {
    pub const EMPTY: PhysicsProperties = PhysicsProperties {
        solid: false,
        liquid: false,
        interactive: false,
    };

    pub const SOLID: PhysicsProperties = PhysicsProperties {
        solid: true,
        liquid: false,
        interactive: false,
    };

    pub const LIQUID: PhysicsProperties = PhysicsProperties {
        solid: false,
        liquid: true,
        interactive: false,
    };

    pub const BUTTON: PhysicsProperties = PhysicsProperties {
        solid: false,
        liquid: false,
        interactive: true,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_display() {
        assert_eq!(BlockId::OBSIDIAN.to_string(), "Obsidian");
        assert_eq!(BlockId(900).to_string(), "Block(900)");
    }

    #[test]
    fn test_block_state_defaults_to_air() {
        assert_eq!(BlockState::default(), BlockState::AIR);
        assert!(!BlockState::of(BlockId::STONE_SLAB).is_bottom_half());
        assert!(BlockState::with_half(BlockId::STONE_SLAB, BlockHalf::Bottom).is_bottom_half());
    }
}
