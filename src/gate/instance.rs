//! A template bound to a place in the world

use super::layout_data::TemplateLayout;
use super::matcher;
use super::transform::{CoordinateTransform, Facing};
use super::vector::RelativeVector;
use crate::world::core::VoxelPos;
use crate::world::interfaces::BlockAccess;
use cgmath::Vector3;
use std::sync::Arc;

/// Structure instance: shared template + origin + facing + backwards flag,
/// with the result of the last verification cached
#[derive(Debug, Clone)]
pub struct StructureInstance {
    template: Arc<TemplateLayout>,
    transform: CoordinateTransform,
    verified: bool,
}

impl StructureInstance {
    pub fn new(
        template: Arc<TemplateLayout>,
        origin: VoxelPos,
        facing: Facing,
        backwards: bool,
    ) -> Self {
        Self {
            template,
            transform: CoordinateTransform::new(origin, facing, backwards),
            verified: false,
        }
    }

    /// Candidate instances that would put one of the template's control
    /// cells at `control`. One candidate per control cell.
    pub fn candidates_at_control(
        template: &Arc<TemplateLayout>,
        control: VoxelPos,
        facing: Facing,
        backwards: bool,
    ) -> Vec<StructureInstance> {
        let at_zero = CoordinateTransform::new(VoxelPos::default(), facing, backwards);
        template
            .controls()
            .iter()
            .map(|cell| {
                let offset = at_zero.absolute(*cell) - VoxelPos::default();
                let origin = control + Vector3::new(-offset.x, -offset.y, -offset.z);
                StructureInstance::new(Arc::clone(template), origin, facing, backwards)
            })
            .collect()
    }

    pub fn template(&self) -> &TemplateLayout {
        &self.template
    }

    pub fn transform(&self) -> CoordinateTransform {
        self.transform
    }

    pub fn origin(&self) -> VoxelPos {
        self.transform.origin
    }

    pub fn facing(&self) -> Facing {
        self.transform.facing
    }

    pub fn is_backwards(&self) -> bool {
        self.transform.backwards
    }

    /// World position of a cell of this structure
    pub fn absolute(&self, relative: RelativeVector) -> VoxelPos {
        self.transform.absolute(relative)
    }

    /// Relative vector of a world position, e.g. a clicked sign or button
    pub fn relative_of(&self, position: VoxelPos) -> RelativeVector {
        self.transform.relative(position)
    }

    /// Whether `position` is one of the two control cells
    pub fn is_control(&self, position: VoxelPos) -> bool {
        let relative = self.relative_of(position);
        self.template.controls().contains(&relative)
    }

    pub fn control_positions(&self) -> Vec<VoxelPos> {
        self.template
            .controls()
            .iter()
            .map(|cell| self.absolute(*cell))
            .collect()
    }

    pub fn entrance_positions(&self) -> Vec<VoxelPos> {
        self.template
            .entrances()
            .iter()
            .map(|cell| self.absolute(*cell))
            .collect()
    }

    /// Match against the world and remember the result
    pub fn verify(&mut self, world: &impl BlockAccess, on_create: bool) -> bool {
        self.verified = matcher::matches(self, world, on_create);
        if !self.verified {
            log::debug!(
                "[StructureInstance::verify] {} at {} no longer matches",
                self.template.name,
                self.origin()
            );
        }
        self.verified
    }

    /// Result of the last [`Self::verify`]; false before the first one
    pub fn is_verified(&self) -> bool {
        self.verified
    }
}
