//! World access seen from the gate engine
//!
//! The engine only ever reads blocks. Hosts implement [`BlockAccess`] over
//! their live world; tests use [`crate::world::MemoryWorld`].

use crate::world::core::{BlockHalf, BlockId, BlockState, VoxelPos};

/// Read-only block access
///
/// Callers make sure every position the engine may read is loaded before
/// handing the world over; implementations never block.
pub trait BlockAccess {
    /// Full block state at a position
    fn block_at(&self, pos: VoxelPos) -> BlockState;

    /// Block type at a position
    fn material_at(&self, pos: VoxelPos) -> BlockId {
        self.block_at(pos).id
    }

    /// Half occupied by a two-part block at a position
    fn half_at(&self, pos: VoxelPos) -> BlockHalf {
        self.block_at(pos).half
    }
}

impl<T: BlockAccess + ?Sized> BlockAccess for &T {
    fn block_at(&self, pos: VoxelPos) -> BlockState {
        (**self).block_at(pos)
    }
}
