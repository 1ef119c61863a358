//! Core world data types
//!
//! Block identities, positions and the material registry. Nothing in here
//! touches a live world.

mod block;
mod position;
mod registry;

pub use block::{BlockHalf, BlockId, BlockState, PhysicsProperties};
pub use position::VoxelPos;
pub use registry::{BlockRegistration, MaterialRegistry};
