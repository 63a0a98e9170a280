#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement control dispatch for all entities.
//!
//! Each tick the dispatcher selects the control strategy configured for an
//! entity's current mode and emits movement commands: manual entities follow
//! the input snapshot, seeking entities follow the target calculator and the
//! pathfinder, and conditional entities switch between two maneuvers based
//! on their distance to a reference target. Strategy selection was validated
//! at load time, so dispatch itself can never fail.

use tilerunner_core::{
    config::{ControlConfig, Maneuver},
    Command, Direction, InputSnapshot, Position, TilePoint, TILE_ALIGNMENT_TOLERANCE,
};
use tilerunner_system_pathfinding::PathPlanner;
use tilerunner_world::{
    query::{EntitySnapshot, EntityView},
    Grid,
};

pub mod targets;

/// Pure system that emits movement commands for every controllable entity.
#[derive(Debug, Default)]
pub struct Control {
    planner: PathPlanner,
}

impl Control {
    /// Creates a new control dispatcher with an empty pathfinding planner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the tick's input snapshot and views to emit movement commands.
    pub fn handle(
        &mut self,
        input: &InputSnapshot,
        view: &EntityView,
        grid: Grid,
        out: &mut Vec<Command>,
    ) {
        for entity in view.iter() {
            let Some(bundle) = entity.bundle() else {
                continue;
            };

            match bundle.control() {
                ControlConfig::Manual => {
                    match input.first_pressed() {
                        Some(direction) if turn_allowed(entity, direction) => {
                            out.push(Command::MoveEntity {
                                id: entity.id,
                                direction,
                            });
                        }
                        // A deferred turn keeps the current step running.
                        Some(_) => {}
                        None => out.push(Command::HaltEntity { id: entity.id }),
                    };
                }
                ControlConfig::TargetSeeking { target } => {
                    // New steps begin only on tile alignment so a seeker can
                    // never cut a corner mid-transition.
                    if !entity.position.is_tile_aligned() {
                        continue;
                    }
                    let goal = targets::compute_target(grid, view, entity, target);
                    self.emit_approach(grid, view, entity, goal, out);
                }
                ControlConfig::ConditionalRadius {
                    target,
                    radius,
                    within,
                    outside,
                } => {
                    if !entity.position.is_tile_aligned() {
                        continue;
                    }
                    let goal = targets::compute_target(grid, view, entity, target);
                    let distance = entity.position.distance_to(Position::from_tile(goal));
                    // Re-evaluated every tick; the choice is never persisted.
                    let maneuver = if distance <= *radius {
                        *within
                    } else {
                        *outside
                    };
                    match maneuver {
                        Maneuver::Approach => {
                            self.emit_approach(grid, view, entity, goal, out);
                        }
                        Maneuver::Flee => {
                            emit_flee(grid, view, entity, goal, out);
                        }
                    }
                }
            }
        }
    }

    fn emit_approach(
        &mut self,
        grid: Grid,
        view: &EntityView,
        entity: &EntitySnapshot,
        goal: TilePoint,
        out: &mut Vec<Command>,
    ) {
        let blocks = blocking_kinds(entity);
        let step = self.planner.next_step(
            grid.width(),
            grid.height(),
            entity.tile(),
            goal,
            |tile| view.blocks_tile(blocks, tile),
        );
        match Direction::from_offset(step) {
            Some(direction) => out.push(Command::MoveEntity {
                id: entity.id,
                direction,
            }),
            None => out.push(Command::HaltEntity { id: entity.id }),
        }
    }
}

/// Steps onto the reachable neighbor that maximizes distance from the goal,
/// halting when no neighbor improves on the current tile.
fn emit_flee(
    grid: Grid,
    view: &EntityView,
    entity: &EntitySnapshot,
    goal: TilePoint,
    out: &mut Vec<Command>,
) {
    let blocks = blocking_kinds(entity);
    let here = entity.tile();
    let mut best: Option<(Direction, u32)> = None;

    for direction in Direction::ALL {
        let neighbor = here.offset_by(direction.offset());
        if !grid.contains(neighbor) || view.blocks_tile(blocks, neighbor) {
            continue;
        }
        let distance = neighbor.manhattan_distance(goal);
        let better = match best {
            None => true,
            Some((_, best_distance)) => distance > best_distance,
        };
        if better {
            best = Some((direction, distance));
        }
    }

    match best {
        Some((direction, distance)) if distance > here.manhattan_distance(goal) => {
            out.push(Command::MoveEntity {
                id: entity.id,
                direction,
            });
        }
        _ => out.push(Command::HaltEntity { id: entity.id }),
    }
}

/// Mid-tile, a manual entity may only move along its current travel axis;
/// perpendicular turns wait for tile alignment so the entity never leaves
/// the lattice. Reversals share the axis and are always allowed.
fn turn_allowed(entity: &EntitySnapshot, direction: Direction) -> bool {
    if entity.position.is_tile_aligned() {
        return true;
    }
    let horizontal = direction.offset().dx() != 0;
    let travel_horizontal = match entity.heading {
        Some(heading) => heading.offset().dx() != 0,
        None => {
            let x = entity.position.x();
            (x - x.round()).abs() > TILE_ALIGNMENT_TOLERANCE
        }
    };
    horizontal == travel_horizontal
}

fn blocking_kinds(entity: &EntitySnapshot) -> &[String] {
    entity
        .bundle()
        .map(|bundle| bundle.blocks())
        .unwrap_or(&[])
}
