//! Coordinate transform between a structure's own frame and the world
//!
//! A structure is described in template axes (`right`, `down`, `out`) as seen
//! by someone standing in front of its control face. Its facing fixes which
//! world axis each of those maps to; `backwards` mirrors depth only.

use super::vector::RelativeVector;
use crate::error::{EngineError, EngineResult};
use crate::world::core::VoxelPos;
use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Tolerance when snapping a yaw to a cardinal facing
const YAW_EPSILON: f32 = 1e-3;

/// Cardinal direction the control face looks toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Yaw 0, out is +Z
    South,
    /// Yaw 90, out is -X
    West,
    /// Yaw 180, out is -Z
    North,
    /// Yaw 270, out is +X
    East,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::South, Facing::West, Facing::North, Facing::East];

    /// Facing for a yaw in degrees. Only exact cardinal yaws are accepted;
    /// snapping is the caller's job.
    pub fn from_yaw(yaw: f32) -> EngineResult<Facing> {
        let normalized = yaw.rem_euclid(360.0);
        let quarter = (normalized / 90.0).round();
        if !normalized.is_finite() || (normalized - quarter * 90.0).abs() > YAW_EPSILON {
            return Err(EngineError::InvalidYaw { yaw });
        }
        Ok(Facing::ALL[(quarter as usize) % 4])
    }

    pub fn yaw(self) -> f32 {
        match self {
            Facing::South => 0.0,
            Facing::West => 90.0,
            Facing::North => 180.0,
            Facing::East => 270.0,
        }
    }

    pub fn opposite(self) -> Facing {
        match self {
            Facing::South => Facing::North,
            Facing::West => Facing::East,
            Facing::North => Facing::South,
            Facing::East => Facing::West,
        }
    }

    /// World direction of the template's `out` axis
    pub fn out_axis(self) -> Vector3<i32> {
        match self {
            Facing::South => Vector3::new(0, 0, 1),
            Facing::West => Vector3::new(-1, 0, 0),
            Facing::North => Vector3::new(0, 0, -1),
            Facing::East => Vector3::new(1, 0, 0),
        }
    }

    /// World direction of the template's `right` axis, for a viewer looking
    /// against `out`
    pub fn right_axis(self) -> Vector3<i32> {
        let out = self.out_axis();
        Vector3::new(out.z, 0, -out.x)
    }
}

/// Maps relative vectors of one structure to world positions and back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateTransform {
    /// World position of the top-left reference corner
    pub origin: VoxelPos,
    pub facing: Facing,
    pub backwards: bool,
}

impl CoordinateTransform {
    pub fn new(origin: VoxelPos, facing: Facing, backwards: bool) -> Self {
        Self {
            origin,
            facing,
            backwards,
        }
    }

    /// Same structure, depth mirrored or not
    pub fn with_backwards(self, backwards: bool) -> Self {
        Self { backwards, ..self }
    }

    pub fn right_axis(&self) -> Vector3<i32> {
        self.facing.right_axis()
    }

    /// World direction of `out`, after mirroring
    pub fn out_axis(&self) -> Vector3<i32> {
        let out = self.facing.out_axis();
        if self.backwards {
            -out
        } else {
            out
        }
    }

    /// World position of a relative vector
    /// Pure function - no world access
    pub fn absolute(&self, relative: RelativeVector) -> VoxelPos {
        let offset = self.right_axis() * relative.right + self.out_axis() * relative.out
            - Vector3::unit_y() * relative.down;
        self.origin + offset
    }

    /// Relative vector of a world position; inverse of [`Self::absolute`]
    /// Pure function - projects the offset onto the structure's axes
    pub fn relative(&self, position: VoxelPos) -> RelativeVector {
        let offset = position - self.origin;
        RelativeVector::new(
            dot(offset, self.right_axis()),
            -offset.y,
            dot(offset, self.out_axis()),
        )
    }

    /// Fractional move from a world point along the structure's axes
    pub fn shift(&self, point: Point3<f64>, right: f64, out: f64) -> Point3<f64> {
        point + to_f64(self.right_axis()) * right + to_f64(self.out_axis()) * out
    }

    /// Yaw of something looking straight out of the structure
    pub fn yaw(&self) -> f32 {
        let yaw = self.facing.yaw();
        if self.backwards {
            (yaw + 180.0) % 360.0
        } else {
            yaw
        }
    }
}

fn dot(a: Vector3<i32>, b: Vector3<i32>) -> i32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

pub(crate) fn to_f64(v: Vector3<i32>) -> Vector3<f64> {
    Vector3::new(v.x as f64, v.y as f64, v.z as f64)
}
