//! Built-in materials
//!
//! The vanilla blocks that gate templates commonly name, plus the tags used
//! for category matches. Hosts register anything else on top of these.

use crate::world::core::{BlockId, MaterialRegistry, PhysicsProperties};

/// (name, id, properties) for every built-in block
const BASIC_BLOCKS: &[(&str, BlockId, PhysicsProperties)] = &[
    ("AIR", BlockId::AIR, PhysicsProperties::EMPTY),
    ("WATER", BlockId::WATER, PhysicsProperties::LIQUID),
    ("LAVA", BlockId::LAVA, PhysicsProperties::LIQUID),
    ("STONE", BlockId::STONE, PhysicsProperties::SOLID),
    ("DIRT", BlockId::DIRT, PhysicsProperties::SOLID),
    ("GRASS_BLOCK", BlockId::GRASS_BLOCK, PhysicsProperties::SOLID),
    ("COBBLESTONE", BlockId::COBBLESTONE, PhysicsProperties::SOLID),
    ("OBSIDIAN", BlockId::OBSIDIAN, PhysicsProperties::SOLID),
    ("CRYING_OBSIDIAN", BlockId::CRYING_OBSIDIAN, PhysicsProperties::SOLID),
    ("NETHER_PORTAL", BlockId::NETHER_PORTAL, PhysicsProperties::EMPTY),
    ("END_GATEWAY", BlockId::END_GATEWAY, PhysicsProperties::EMPTY),
    ("GLOWSTONE", BlockId::GLOWSTONE, PhysicsProperties::SOLID),
    ("STONE_BUTTON", BlockId::STONE_BUTTON, PhysicsProperties::BUTTON),
    ("OAK_BUTTON", BlockId::OAK_BUTTON, PhysicsProperties::BUTTON),
    ("STONE_SLAB", BlockId::STONE_SLAB, PhysicsProperties::SOLID),
    ("OAK_SLAB", BlockId::OAK_SLAB, PhysicsProperties::SOLID),
    ("OAK_STAIRS", BlockId::OAK_STAIRS, PhysicsProperties::SOLID),
    ("WHITE_WOOL", BlockId::WHITE_WOOL, PhysicsProperties::SOLID),
    ("RED_WOOL", BlockId::RED_WOOL, PhysicsProperties::SOLID),
    ("BLUE_WOOL", BlockId::BLUE_WOOL, PhysicsProperties::SOLID),
    ("OAK_SIGN", BlockId::OAK_SIGN, PhysicsProperties::EMPTY),
    ("TALL_GRASS", BlockId::TALL_GRASS, PhysicsProperties::EMPTY),
    ("BEDROCK", BlockId::BEDROCK, PhysicsProperties::SOLID),
];

/// Register all basic blocks and tags with the registry
pub fn register_basic_blocks(registry: &mut MaterialRegistry) {
    for (name, id, properties) in BASIC_BLOCKS {
        registry.register_with_id(name, *id, *properties);
    }

    registry.register_tag(
        "WOOL",
        &[BlockId::WHITE_WOOL, BlockId::RED_WOOL, BlockId::BLUE_WOOL],
    );
    registry.register_tag("BUTTONS", &[BlockId::STONE_BUTTON, BlockId::OAK_BUTTON]);
    registry.register_tag("SLABS", &[BlockId::STONE_SLAB, BlockId::OAK_SLAB]);
    registry.register_tag("OBSIDIANS", &[BlockId::OBSIDIAN, BlockId::CRYING_OBSIDIAN]);

    log::info!(
        "[register_basic_blocks] Registered {} built-in materials",
        BASIC_BLOCKS.len()
    );
}
