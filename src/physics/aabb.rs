/// Data-Oriented Axis-Aligned Bounding Box System
///
/// Pure functions over occupant boxes in world space - no methods, just data
/// transformations. The exit resolver uses these to find which blocks an
/// occupant would overlap or stand on.
use crate::world::core::VoxelPos;
use cgmath::Point3;

/// Faces that merely touch a block boundary do not count as overlapping it.
const TOUCH_EPSILON: f64 = 1e-6;

/// Axis-Aligned Bounding Box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

/// Create the box of an occupant standing at `feet`
/// Pure function - square footprint of `width` centered on the feet, `height` tall
pub fn aabb_from_feet(feet: Point3<f64>, width: f64, height: f64) -> AABB {
    let half = width * 0.5;
    AABB {
        min: Point3::new(feet.x - half, feet.y, feet.z - half),
        max: Point3::new(feet.x + half, feet.y + height, feet.z + half),
    }
}

/// Blocks whose unit cube the box overlaps
/// Pure function - enumerates block positions, bottom layer first
pub fn aabb_blocks(aabb: &AABB) -> Vec<VoxelPos> {
    let (min, max) = block_range(aabb);
    let mut blocks = Vec::new();
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            for z in min.z..=max.z {
                blocks.push(VoxelPos::new(x, y, z));
            }
        }
    }
    blocks
}

/// Blocks directly beneath the box's footprint
/// Pure function - one layer of positions under the bottom face
pub fn aabb_floor_blocks(aabb: &AABB) -> Vec<VoxelPos> {
    let (min, max) = block_range(aabb);
    let floor_y = (aabb.min.y - TOUCH_EPSILON).floor() as i32;
    let mut blocks = Vec::new();
    for x in min.x..=max.x {
        for z in min.z..=max.z {
            blocks.push(VoxelPos::new(x, floor_y, z));
        }
    }
    blocks
}

fn block_range(aabb: &AABB) -> (VoxelPos, VoxelPos) {
    let min = VoxelPos::containing(aabb.min);
    let max = VoxelPos::new(
        ((aabb.max.x - TOUCH_EPSILON).floor() as i32).max(min.x),
        ((aabb.max.y - TOUCH_EPSILON).floor() as i32).max(min.y),
        ((aabb.max.z - TOUCH_EPSILON).floor() as i32).max(min.z),
    );
    (min, max)
}
