//! Exit Resolution Operations
//!
//! Finds where an occupant leaving a structure should land. The default point
//! sits one block out from the exit cell, centred in the opening for wide
//! occupants and pushed further out for big ones. Only when that point is
//! obstructed does the bounded cone search run.
//!
//! The cone grows one layer at a time from the cells in front of every
//! opening. Outward growth continues for `OUTWARD_LAYERS` layers; sideways and
//! vertical growth stops after `SPREAD_LAYERS`.

use super::exit_data::{ExitLocation, ExitQuery, ExitResult, ExitSource, Occupant};
use super::layout_data::TemplateLayout;
use super::transform::CoordinateTransform;
use super::vector::RelativeVector;
use crate::constants::exit_search::{
    MOUNTED_EXTRA_OFFSET, OUTWARD_LAYERS, SPREAD_LAYERS, VERTICAL_CORRECTION,
};
use crate::physics::{aabb_blocks, aabb_floor_blocks, aabb_from_feet};
use crate::world::core::{BlockId, MaterialRegistry, VoxelPos};
use crate::world::interfaces::BlockAccess;
use cgmath::{MetricSpace, Point3};
use rustc_hash::FxHashSet;

const OUTWARD: RelativeVector = RelativeVector::new(0, 0, 1);

const SPREAD: [RelativeVector; 4] = [
    RelativeVector::new(-1, 0, 0),
    RelativeVector::new(1, 0, 0),
    RelativeVector::new(0, -1, 0),
    RelativeVector::new(0, 1, 0),
];

/// Resolve the landing location for a query
pub fn resolve(
    query: &ExitQuery<'_>,
    world: &impl BlockAccess,
    registry: &MaterialRegistry,
) -> ExitResult {
    let layout = query.instance.template();
    let transform = query.instance.transform().with_backwards(query.backwards);
    let yaw = transform.yaw();

    let Some(exit) = layout.exit() else {
        log::warn!("[exit_operations::resolve] {} has no exit cell", layout.name);
        return ExitResult::Unresolved;
    };

    let position = default_exit_point(layout, exit, &transform, &query.occupant, world);
    if is_unobstructed(position, &query.occupant, world, registry) {
        return ExitResult::Resolved(ExitLocation {
            position,
            yaw,
            source: ExitSource::Default,
        });
    }

    log::debug!(
        "[exit_operations::resolve] Default exit of {} at {:?} is obstructed, searching",
        layout.name,
        position
    );
    match cone_search(layout, exit, &transform, &query.occupant, world, registry) {
        Some((position, layer)) => {
            log::debug!(
                "[exit_operations::resolve] Found exit for {} at {:?} in layer {}",
                layout.name,
                position,
                layer
            );
            ExitResult::Resolved(ExitLocation {
                position,
                yaw,
                source: ExitSource::Search { layer },
            })
        }
        None => {
            log::debug!(
                "[exit_operations::resolve] No exit for {} within {} layers",
                layout.name,
                OUTWARD_LAYERS
            );
            ExitResult::Unresolved
        }
    }
}

/// Default landing point in front of `exit`, before any obstruction check
pub fn default_exit_point(
    layout: &TemplateLayout,
    exit: RelativeVector,
    transform: &CoordinateTransform,
    occupant: &Occupant,
    world: &impl BlockAccess,
) -> Point3<f64> {
    let landing = transform.absolute(exit + OUTWARD);
    let mut position = landing.floor_center();

    if occupant.is_wide() {
        position = transform.shift(position, opening_centre_offset(layout, exit), 0.0);
        if occupant.size() > 1.0 {
            let mut push = occupant.size().ceil() / 2.0;
            if occupant.mounted {
                push += MOUNTED_EXTRA_OFFSET;
            }
            position = transform.shift(position, 0.0, push);
        }
    }

    vertical_correction(position, world)
}

/// Offset along `right` from the centre of the exit cell to the centre of its
/// opening row. The row is the run of `exits` cells through the exit cell.
/// Pure function - reads only the template
pub fn opening_centre_offset(layout: &TemplateLayout, exit: RelativeVector) -> f64 {
    let exits = layout.exits();
    let on_row = |right: i32| exits.contains(&RelativeVector::new(right, exit.down, exit.out));

    let mut left = exit.right;
    while on_row(left - 1) {
        left -= 1;
    }
    let mut right = exit.right;
    while on_row(right + 1) {
        right += 1;
    }

    let width = (right - left + 1) as f64;
    let existing = (exit.right - left) as f64;
    // measured from the exit cell's left edge, then back to its centre
    let offset = width / 2.0 - existing;
    offset - 0.5
}

/// Lift a point standing in a bottom slab or in water by one block
pub fn vertical_correction(position: Point3<f64>, world: &impl BlockAccess) -> Point3<f64> {
    let block = world.block_at(VoxelPos::containing(position));
    if block.is_bottom_half() || block.id == BlockId::WATER {
        log::debug!(
            "[exit_operations::vertical_correction] Raising exit above {:?}",
            block.id
        );
        Point3::new(position.x, position.y + VERTICAL_CORRECTION, position.z)
    } else {
        position
    }
}

/// No solid block inside the occupant's box at `position`
pub fn is_unobstructed(
    position: Point3<f64>,
    occupant: &Occupant,
    world: &impl BlockAccess,
    registry: &MaterialRegistry,
) -> bool {
    let aabb = aabb_from_feet(position, occupant.width, occupant.height);
    aabb_blocks(&aabb)
        .into_iter()
        .all(|block| !registry.is_solid(world.material_at(block)))
}

/// At least one solid block under the occupant's footprint
pub fn has_floor(
    position: Point3<f64>,
    occupant: &Occupant,
    world: &impl BlockAccess,
    registry: &MaterialRegistry,
) -> bool {
    let aabb = aabb_from_feet(position, occupant.width, occupant.height);
    aabb_floor_blocks(&aabb)
        .into_iter()
        .any(|block| registry.is_solid(world.material_at(block)))
}

/// Sideways offsets tried at every cone cell. Wide occupants also try the
/// half-block offset that lines their footprint up with the block grid, the
/// same alignment the default point gets from the opening centre.
/// Pure function - reads only the template and the occupant size
pub fn lateral_shifts(
    layout: &TemplateLayout,
    exit: RelativeVector,
    occupant: &Occupant,
) -> Vec<f64> {
    if !occupant.is_wide() {
        return vec![0.0];
    }
    let aligned = opening_centre_offset(layout, exit).fract();
    let half = if aligned != 0.0 {
        aligned
    } else if occupant.width.ceil() as i64 % 2 == 0 {
        -0.5
    } else {
        return vec![0.0];
    };
    vec![half, -half, 0.0]
}

/// Bounded layered search in front of the openings.
/// Returns the accepted point and the layer it was found in.
fn cone_search(
    layout: &TemplateLayout,
    exit: RelativeVector,
    transform: &CoordinateTransform,
    occupant: &Occupant,
    world: &impl BlockAccess,
    registry: &MaterialRegistry,
) -> Option<(Point3<f64>, usize)> {
    let centre = logical_centre(layout.entrances());
    let shifts = lateral_shifts(layout, exit, occupant);
    let mut visited: FxHashSet<RelativeVector> = FxHashSet::default();
    let mut layer: Vec<RelativeVector> = layout
        .entrances()
        .iter()
        .map(|cell| *cell + OUTWARD)
        .filter(|seed| visited.insert(*seed))
        .collect();

    for depth in 0..=OUTWARD_LAYERS {
        layer.sort_by(|a, b| {
            as_point(*a)
                .distance2(centre)
                .total_cmp(&as_point(*b).distance2(centre))
        });

        for cell in &layer {
            let base = transform.absolute(*cell).floor_center();
            for &shift in &shifts {
                let position = transform.shift(base, shift, 0.0);
                if is_unobstructed(position, occupant, world, registry)
                    && has_floor(position, occupant, world, registry)
                {
                    return Some((position, depth));
                }
            }
        }

        if depth == OUTWARD_LAYERS {
            break;
        }
        layer = expand_layer(&layer, depth < SPREAD_LAYERS, &mut visited);
        if layer.is_empty() {
            break;
        }
    }
    None
}

/// Next layer of the cone
/// Pure function - every cell offset by the allowed directions, minus cells already seen
fn expand_layer(
    layer: &[RelativeVector],
    spread: bool,
    visited: &mut FxHashSet<RelativeVector>,
) -> Vec<RelativeVector> {
    let mut next = Vec::new();
    for &cell in layer {
        let mut push = |candidate: RelativeVector| {
            if visited.insert(candidate) {
                next.push(candidate);
            }
        };
        push(cell + OUTWARD);
        if spread {
            for direction in SPREAD {
                push(cell + direction);
            }
        }
    }
    next
}

fn logical_centre(entrances: &[RelativeVector]) -> Point3<f64> {
    if entrances.is_empty() {
        return Point3::new(0.0, 0.0, 0.0);
    }
    let count = entrances.len() as f64;
    let (right, down, out) = entrances.iter().fold((0.0, 0.0, 0.0), |acc, cell| {
        (
            acc.0 + cell.right as f64,
            acc.1 + cell.down as f64,
            acc.2 + cell.out as f64,
        )
    });
    Point3::new(right / count, down / count, out / count)
}

fn as_point(cell: RelativeVector) -> Point3<f64> {
    Point3::new(cell.right as f64, cell.down as f64, cell.out as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::instance::StructureInstance;
    use crate::gate::layout_operations::{parse_template, ParseOptions};
    use crate::gate::transform::Facing;
    use crate::world::core::{BlockHalf, BlockState};
    use crate::world::MemoryWorld;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    /// Ignore border, one entrance column, two controls
    const COLUMN_GATE: &str = " . \n-.-\n . \n\n-=OBSIDIAN\n";
    const WIDE_GATE: &str = "XXXX\n-..-\nX..X\nXXXX\n\nX=OBSIDIAN\n-=OBSIDIAN\n";

    fn instance(text: &str, facing: Facing, backwards: bool) -> StructureInstance {
        let registry = MaterialRegistry::new();
        let layout = parse_template("gate", text, &registry, ParseOptions::default())
            .expect("valid template");
        StructureInstance::new(Arc::new(layout), VoxelPos::new(0, 64, 0), facing, backwards)
    }

    fn build(world: &mut MemoryWorld, instance: &StructureInstance) {
        for cell in instance.template().border() {
            world.set_block(instance.absolute(*cell), BlockId::OBSIDIAN);
        }
        for cell in instance.template().entrances() {
            world.set_block(instance.absolute(*cell), BlockId::NETHER_PORTAL);
        }
    }

    fn with_floor(instance: &StructureInstance) -> MemoryWorld {
        let mut world = MemoryWorld::new();
        world.fill(
            VoxelPos::new(-12, 61, -12),
            VoxelPos::new(12, 61, 12),
            BlockId::STONE,
        );
        build(&mut world, instance);
        world
    }

    fn resolved(result: ExitResult) -> ExitLocation {
        match result {
            ExitResult::Resolved(location) => location,
            ExitResult::Unresolved => panic!("expected a resolved exit"),
        }
    }

    #[test]
    fn test_player_lands_in_front_of_exit() {
        let instance = instance(COLUMN_GATE, Facing::South, false);
        let world = with_floor(&instance);
        let registry = MaterialRegistry::new();

        let location = resolved(resolve(
            &ExitQuery::new(&instance, Occupant::PLAYER),
            &world,
            &registry,
        ));
        assert_eq!(location.position, Point3::new(1.5, 62.0, 1.5));
        assert_eq!(location.yaw, 0.0);
        assert_eq!(location.source, ExitSource::Default);
    }

    #[test]
    fn test_backwards_exit_uses_back_face() {
        let instance = instance(COLUMN_GATE, Facing::South, true);
        let world = with_floor(&instance);
        let registry = MaterialRegistry::new();

        let location = resolved(resolve(
            &ExitQuery::new(&instance, Occupant::PLAYER),
            &world,
            &registry,
        ));
        assert_eq!(location.position, Point3::new(1.5, 62.0, -0.5));
        assert_eq!(location.yaw, 180.0);

        let front = resolved(resolve(
            &ExitQuery::new(&instance, Occupant::PLAYER).with_backwards(false),
            &world,
            &registry,
        ));
        assert_eq!(front.position, Point3::new(1.5, 62.0, 1.5));
    }

    #[test]
    fn test_wide_occupant_centred_and_pushed_out() {
        let instance = instance(WIDE_GATE, Facing::South, false);
        let world = with_floor(&instance);
        let registry = MaterialRegistry::new();
        assert_eq!(instance.template().exit(), Some(RelativeVector::cell(2, 2)));

        let wide = Occupant::new(2.0, 2.0);
        let location = resolved(resolve(&ExitQuery::new(&instance, wide), &world, &registry));
        assert_eq!(location.position, Point3::new(2.0, 62.0, 2.5));

        let location = resolved(resolve(
            &ExitQuery::new(&instance, wide.mounted()),
            &world,
            &registry,
        ));
        assert_eq!(location.position, Point3::new(2.0, 62.0, 3.5));
    }

    #[test]
    fn test_opening_centre_offsets() {
        let instance = instance(WIDE_GATE, Facing::South, false);
        let layout = instance.template();
        assert_eq!(opening_centre_offset(layout, RelativeVector::cell(1, 2)), 0.5);
        assert_eq!(opening_centre_offset(layout, RelativeVector::cell(2, 2)), -0.5);

        let column = self::instance(COLUMN_GATE, Facing::South, false);
        assert_eq!(
            opening_centre_offset(column.template(), RelativeVector::cell(1, 2)),
            0.0
        );
    }

    #[test]
    fn test_boat_over_water_is_raised_and_centred() {
        let instance = instance(COLUMN_GATE, Facing::South, false);
        let mut world = with_floor(&instance);
        world.fill(
            VoxelPos::new(-3, 62, 1),
            VoxelPos::new(5, 62, 6),
            BlockId::WATER,
        );
        let registry = MaterialRegistry::new();
        let naive = instance.absolute(RelativeVector::cell(1, 2).with_out(1));

        let boat = Occupant::new(2.0, 2.0);
        let location = resolved(resolve(&ExitQuery::new(&instance, boat), &world, &registry));
        assert_eq!(location.position.y, naive.y as f64 + 1.0);
        assert_eq!(location.position.x, naive.floor_center().x);
        assert_eq!(location.source, ExitSource::Default);
    }

    #[test]
    fn test_bottom_slab_raises_exit() {
        let instance = instance(COLUMN_GATE, Facing::West, false);
        let mut world = with_floor(&instance);
        let registry = MaterialRegistry::new();
        let landing = instance.absolute(RelativeVector::cell(1, 2).with_out(1));
        world.set_block(
            landing,
            BlockState::with_half(BlockId::STONE_SLAB, BlockHalf::Bottom),
        );

        let location = resolved(resolve(
            &ExitQuery::new(&instance, Occupant::PLAYER),
            &world,
            &registry,
        ));
        assert_eq!(location.position, landing.above().floor_center());
        assert_eq!(location.yaw, 90.0);
    }

    #[test]
    fn test_obstructed_exit_searches_nearby() {
        let instance = instance(COLUMN_GATE, Facing::South, false);
        let mut world = with_floor(&instance);
        world.set_block(VoxelPos::new(1, 62, 1), BlockId::STONE);
        world.set_block(VoxelPos::new(1, 63, 1), BlockId::STONE);
        let registry = MaterialRegistry::new();

        let location = resolved(resolve(
            &ExitQuery::new(&instance, Occupant::PLAYER),
            &world,
            &registry,
        ));
        // standing on top of the obstruction
        assert_eq!(location.position, Point3::new(1.5, 64.0, 1.5));
        assert_eq!(location.source, ExitSource::Search { layer: 0 });
    }

    #[test]
    fn test_search_pushes_past_a_wall() {
        let instance = instance(COLUMN_GATE, Facing::South, false);
        let mut world = with_floor(&instance);
        world.fill(
            VoxelPos::new(-10, 62, 1),
            VoxelPos::new(10, 70, 2),
            BlockId::STONE,
        );
        let registry = MaterialRegistry::new();

        let location = resolved(resolve(
            &ExitQuery::new(&instance, Occupant::PLAYER),
            &world,
            &registry,
        ));
        assert_eq!(location.position, Point3::new(1.5, 62.0, 3.5));
        assert_eq!(location.source, ExitSource::Search { layer: 2 });
    }

    #[test]
    fn test_wide_occupant_fits_corridor_of_its_width() {
        let instance = instance(WIDE_GATE, Facing::South, false);
        let mut world = with_floor(&instance);
        // corridor two blocks wide at x = 1..=2
        world.fill(VoxelPos::new(-10, 62, 1), VoxelPos::new(0, 70, 14), BlockId::STONE);
        world.fill(VoxelPos::new(3, 62, 1), VoxelPos::new(10, 70, 14), BlockId::STONE);
        // pillar in front of the opening blocks the default point
        world.fill(VoxelPos::new(1, 62, 2), VoxelPos::new(1, 70, 2), BlockId::STONE);
        let registry = MaterialRegistry::new();
        let boat = Occupant::new(2.0, 2.0);

        let location = resolved(resolve(&ExitQuery::new(&instance, boat), &world, &registry));
        assert_eq!(location.position, Point3::new(2.0, 62.0, 4.5));
        assert_eq!(location.source, ExitSource::Search { layer: 3 });
        assert!(is_unobstructed(location.position, &boat, &world, &registry));
    }

    #[test]
    fn test_lateral_shifts() {
        let column = instance(COLUMN_GATE, Facing::South, false);
        let column = column.template();
        let exit = column.exit().expect("exit");
        assert_eq!(lateral_shifts(column, exit, &Occupant::PLAYER), vec![0.0]);
        assert_eq!(
            lateral_shifts(column, exit, &Occupant::new(2.0, 1.0)),
            vec![-0.5, 0.5, 0.0]
        );
        assert_eq!(lateral_shifts(column, exit, &Occupant::new(3.0, 1.0)), vec![0.0]);

        let wide = instance(WIDE_GATE, Facing::South, false);
        let wide = wide.template();
        let exit = wide.exit().expect("exit");
        assert_eq!(
            lateral_shifts(wide, exit, &Occupant::new(2.0, 2.0)),
            vec![-0.5, 0.5, 0.0]
        );
    }

    #[test]
    fn test_buried_gate_is_unresolved() {
        let instance = instance(COLUMN_GATE, Facing::South, false);
        let mut world = MemoryWorld::new();
        world.fill(
            VoxelPos::new(-15, 45, -15),
            VoxelPos::new(15, 85, 15),
            BlockId::STONE,
        );
        build(&mut world, &instance);
        let registry = MaterialRegistry::new();

        let result = resolve(&ExitQuery::new(&instance, Occupant::PLAYER), &world, &registry);
        assert_eq!(result, ExitResult::Unresolved);
        assert!(result.location().is_none());
    }

    #[test]
    fn test_cone_layers_are_bounded() {
        let seeds = vec![RelativeVector::new(0, 0, 1)];
        let mut visited: FxHashSet<RelativeVector> = seeds.iter().copied().collect();
        let mut layer = seeds;
        for depth in 0..OUTWARD_LAYERS {
            layer = expand_layer(&layer, depth < SPREAD_LAYERS, &mut visited);
        }
        let max_out = visited.iter().map(|cell| cell.out).max();
        let max_right = visited.iter().map(|cell| cell.right.abs()).max();
        let max_down = visited.iter().map(|cell| cell.down.abs()).max();
        assert_eq!(max_out, Some(1 + OUTWARD_LAYERS as i32));
        assert_eq!(max_right, Some(SPREAD_LAYERS as i32));
        assert_eq!(max_down, Some(SPREAD_LAYERS as i32));
    }

    #[test]
    fn test_resolved_exit_never_inside_solid() {
        let registry = MaterialRegistry::new();
        for seed in 0..40u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let facing = Facing::ALL[rng.gen_range(0..4)];
            let instance = instance(WIDE_GATE, facing, false);
            let mut world = with_floor(&instance);
            for _ in 0..60 {
                let pos = VoxelPos::new(
                    rng.gen_range(-9..=9),
                    rng.gen_range(62..=68),
                    rng.gen_range(-9..=9),
                );
                if !instance.entrance_positions().contains(&pos) {
                    world.set_block(pos, BlockId::COBBLESTONE);
                }
            }

            for occupant in [Occupant::PLAYER, Occupant::new(2.0, 2.0)] {
                let result = resolve(&ExitQuery::new(&instance, occupant), &world, &registry);
                if let Some(location) = result.location() {
                    assert!(
                        is_unobstructed(location.position, &occupant, &world, &registry),
                        "seed {} landed inside a block",
                        seed
                    );
                }
            }
        }
    }
}
