//! Block definitions that ship with the engine

mod basic_blocks;

pub use basic_blocks::register_basic_blocks;
