//! World Module
//!
//! Everything the gate engine knows about the host world: block identities,
//! the material registry, and the read-only access trait.
//!
//! # Architecture Overview
//!
//! - **Core**: Fundamental data types (BlockId, BlockState, VoxelPos, MaterialRegistry)
//! - **Blocks**: Built-in material table and tags
//! - **Interfaces**: `BlockAccess`, the only world contract the engine depends on
//! - **MemoryWorld**: sparse in-memory implementation for tests and tooling

pub mod blocks;
pub mod core;
pub mod interfaces;
pub mod memory_world;

// Re-export core types for convenience
pub use core::{
    BlockHalf, BlockId, BlockRegistration, BlockState, MaterialRegistry, PhysicsProperties,
    VoxelPos,
};

pub use blocks::register_basic_blocks;
pub use interfaces::BlockAccess;
pub use memory_world::MemoryWorld;
