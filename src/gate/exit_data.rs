//! Exit Resolution Data - Pure DOP Structures
//!
//! Inputs and outputs of the exit resolver. The resolver itself lives in
//! `exit_operations`.

use super::instance::StructureInstance;
use cgmath::Point3;

/// Bounding box of whatever is coming through the portal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    /// Footprint edge length, in blocks
    pub width: f64,
    pub height: f64,
    /// Carrying a rider that needs headroom clear of the structure
    pub mounted: bool,
}

impl Occupant {
    pub const PLAYER: Occupant = Occupant {
        width: 0.6,
        height: 1.8,
        mounted: false,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            mounted: false,
        }
    }

    pub const fn mounted(self) -> Self {
        Self {
            mounted: true,
            ..self
        }
    }

    /// Wider than one block
    pub fn is_wide(&self) -> bool {
        self.width > 1.0
    }

    /// Largest box dimension
    pub fn size(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Where to put an occupant leaving a structure
#[derive(Debug, Clone, Copy)]
pub struct ExitQuery<'a> {
    pub instance: &'a StructureInstance,
    pub occupant: Occupant,
    /// Leave through the back face instead of the control face
    pub backwards: bool,
}

impl<'a> ExitQuery<'a> {
    /// Query using the instance's own backwards flag
    pub fn new(instance: &'a StructureInstance, occupant: Occupant) -> Self {
        Self {
            instance,
            occupant,
            backwards: instance.is_backwards(),
        }
    }

    pub fn with_backwards(self, backwards: bool) -> Self {
        Self { backwards, ..self }
    }
}

/// How an exit location was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSource {
    /// The default point in front of the exit cell
    Default,
    /// The bounded search, at this layer
    Search { layer: usize },
}

/// A landing location; pitch and roll are the caller's
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitLocation {
    /// Feet position in world space
    pub position: Point3<f64>,
    /// Faces straight out of the structure
    pub yaw: f32,
    pub source: ExitSource,
}

/// Outcome of exit resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitResult {
    Resolved(ExitLocation),
    /// No safe spot within the search bound; the caller picks a fallback
    Unresolved,
}

impl ExitResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ExitResult::Resolved(_))
    }

    pub fn location(&self) -> Option<&ExitLocation> {
        match self {
            ExitResult::Resolved(location) => Some(location),
            ExitResult::Unresolved => None,
        }
    }
}
