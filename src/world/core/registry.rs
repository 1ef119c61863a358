use super::{BlockId, PhysicsProperties};
use rustc_hash::{FxHashMap, FxHashSet};

/// Block registration data
#[derive(Debug, Clone)]
pub struct BlockRegistration {
    pub id: BlockId,
    pub name: String,
    pub properties: PhysicsProperties,
}

/// Registry that maps material names and tags to block types
///
/// Names are stored upper-case without a namespace, so `minecraft:obsidian`,
/// `obsidian` and `OBSIDIAN` all resolve to the same block.
pub struct MaterialRegistry {
    /// Map from BlockId to properties
    blocks: FxHashMap<BlockId, PhysicsProperties>,
    /// Map from name to BlockId
    name_to_id: FxHashMap<String, BlockId>,
    /// Tag name to member blocks
    tags: FxHashMap<String, FxHashSet<BlockId>>,
    /// All registered blocks
    registrations: Vec<BlockRegistration>,
    next_custom_id: u16,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialRegistry {
    /// Registry preloaded with the built-in materials and tags
    pub fn new() -> Self {
        let mut registry = Self::empty();
        crate::world::blocks::register_basic_blocks(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            blocks: FxHashMap::default(),
            name_to_id: FxHashMap::default(),
            tags: FxHashMap::default(),
            registrations: Vec::new(),
            next_custom_id: 1000, // built-in blocks stay below 1000
        }
    }

    /// Normalize a material name for lookup
    pub fn normalize_name(name: &str) -> String {
        let trimmed = name.trim();
        let bare = trimmed
            .rsplit_once(':')
            .map(|(_, bare)| bare)
            .unwrap_or(trimmed);
        bare.to_ascii_uppercase()
    }

    /// Register a block under a fixed id
    pub fn register_with_id(&mut self, name: &str, id: BlockId, properties: PhysicsProperties) {
        let name = Self::normalize_name(name);
        log::debug!("[MaterialRegistry::register_with_id] {} -> {}", name, id.0);

        self.blocks.insert(id, properties);
        self.name_to_id.insert(name.clone(), id);
        self.registrations.push(BlockRegistration {
            id,
            name,
            properties,
        });
    }

    /// Register a new block type and assign it the next free id
    pub fn register_material(&mut self, name: &str, properties: PhysicsProperties) -> BlockId {
        if let Some(existing) = self.get_id(name) {
            return existing;
        }
        let id = BlockId(self.next_custom_id);
        self.next_custom_id += 1;
        self.register_with_id(name, id, properties);
        id
    }

    /// Register or extend a tag
    pub fn register_tag(&mut self, tag: &str, members: &[BlockId]) {
        self.tags
            .entry(Self::normalize_name(tag))
            .or_default()
            .extend(members.iter().copied());
    }

    /// Get a block ID by name
    pub fn get_id(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(&Self::normalize_name(name)).copied()
    }

    /// Name a block was registered under
    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        self.registrations
            .iter()
            .find(|registration| registration.id == id)
            .map(|registration| registration.name.as_str())
    }

    /// Members of a tag
    pub fn tag(&self, name: &str) -> Option<&FxHashSet<BlockId>> {
        self.tags.get(&Self::normalize_name(name))
    }

    /// Unregistered blocks count as solid so nobody is placed inside them.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.blocks.get(&id).map_or(true, |p| p.solid)
    }

    pub fn is_liquid(&self, id: BlockId) -> bool {
        self.blocks.get(&id).map_or(false, |p| p.liquid)
    }

    pub fn is_interactive(&self, id: BlockId) -> bool {
        self.blocks.get(&id).map_or(false, |p| p.interactive)
    }
}
