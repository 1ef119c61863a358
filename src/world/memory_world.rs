//! In-memory world
//!
//! Sparse block storage; every position never written reads as air.

use super::core::{BlockId, BlockState, VoxelPos};
use super::interfaces::BlockAccess;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryWorld {
    blocks: FxHashMap<VoxelPos, BlockState>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_block(&mut self, pos: VoxelPos, state: impl Into<BlockState>) {
        let state = state.into();
        if state == BlockState::AIR {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    /// Fill the inclusive box between two corners
    pub fn fill(&mut self, from: VoxelPos, to: VoxelPos, state: impl Into<BlockState>) {
        let state = state.into();
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for z in from.z.min(to.z)..=from.z.max(to.z) {
                    self.set_block(VoxelPos::new(x, y, z), state);
                }
            }
        }
    }

    /// Number of non-air blocks stored
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn count_of(&self, id: BlockId) -> usize {
        self.blocks.values().filter(|state| state.id == id).count()
    }
}

impl BlockAccess for MemoryWorld {
    fn block_at(&self, pos: VoxelPos) -> BlockState {
        self.blocks.get(&pos).copied().unwrap_or(BlockState::AIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_positions_are_air() {
        let world = MemoryWorld::new();
        assert_eq!(world.material_at(VoxelPos::new(5, 70, -5)), BlockId::AIR);
        assert!(world.is_empty());
    }

    #[test]
    fn test_fill_and_clear() {
        let mut world = MemoryWorld::new();
        world.fill(VoxelPos::new(0, 0, 0), VoxelPos::new(2, 1, 0), BlockId::STONE);
        assert_eq!(world.len(), 6);
        assert_eq!(world.count_of(BlockId::STONE), 6);

        world.set_block(VoxelPos::new(1, 1, 0), BlockId::AIR);
        assert_eq!(world.len(), 5);
        assert_eq!(world.material_at(VoxelPos::new(1, 1, 0)), BlockId::AIR);
    }
}
