use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Position relative to a structure's top-left reference corner
///
/// Axes are those of someone standing in front of the structure looking at
/// its control face: `right` across, `down` toward the ground, `out` toward
/// the viewer. No world rotation is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RelativeVector {
    pub right: i32,
    pub down: i32,
    pub out: i32,
}

impl RelativeVector {
    pub const ORIGIN: RelativeVector = RelativeVector::new(0, 0, 0);

    pub const fn new(right: i32, down: i32, out: i32) -> Self {
        Self { right, down, out }
    }

    /// Grid cell at `column`, `row` on the structure's face
    pub const fn cell(column: usize, row: usize) -> Self {
        Self::new(column as i32, row as i32, 0)
    }

    pub fn moved(self, right: i32, down: i32, out: i32) -> Self {
        Self::new(self.right + right, self.down + down, self.out + out)
    }

    pub fn with_out(self, out: i32) -> Self {
        Self::new(self.right, self.down, out)
    }

    /// Squared euclidean distance, in blocks
    pub fn distance_squared(self, other: RelativeVector) -> i64 {
        let dr = (self.right - other.right) as i64;
        let dd = (self.down - other.down) as i64;
        let dout = (self.out - other.out) as i64;
        dr * dr + dd * dd + dout * dout
    }
}

impl Add for RelativeVector {
    type Output = RelativeVector;

    fn add(self, rhs: RelativeVector) -> RelativeVector {
        self.moved(rhs.right, rhs.down, rhs.out)
    }
}

impl fmt::Display for RelativeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[right={}, down={}, out={}]", self.right, self.down, self.out)
    }
}
