use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Integer block position in world space (Y up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    pub fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Block containing a world-space point
    pub fn containing(point: Point3<f64>) -> Self {
        Self::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// Center of the block's bottom face, where an occupant stands
    pub fn floor_center(self) -> Point3<f64> {
        Point3::new(self.x as f64 + 0.5, self.y as f64, self.z as f64 + 0.5)
    }
}

impl Add<Vector3<i32>> for VoxelPos {
    type Output = VoxelPos;

    fn add(self, rhs: Vector3<i32>) -> VoxelPos {
        self.offset(rhs.x, rhs.y, rhs.z)
    }
}

impl Sub for VoxelPos {
    type Output = Vector3<i32>;

    fn sub(self, rhs: VoxelPos) -> Vector3<i32> {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for VoxelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
