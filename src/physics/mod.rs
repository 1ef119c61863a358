//! Physics Module - occupant bounding boxes

pub mod aabb;

// Simple re-exports
pub use aabb::{aabb_blocks, aabb_floor_blocks, aabb_from_feet, AABB};
