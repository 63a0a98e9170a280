#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilerunner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that systems and
//! adapters react to deterministically. The [`config`] module holds the typed
//! configuration model that an external loader produces; no behavior in this
//! workspace is hardcoded per game.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod config;

/// Distance from an integer tile coordinate below which an entity counts as
/// tile-aligned and may begin a new step.
pub const TILE_ALIGNMENT_TOLERANCE: f32 = 1e-3;

/// Cardinal movement directions available to entities.
///
/// `Up` points toward decreasing row indices so that configuration authored
/// in screen coordinates reads naturally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in the fixed evaluation order used for deterministic
    /// tie-breaking throughout the engine.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit tile offset produced by one step in this direction.
    #[must_use]
    pub const fn offset(self) -> StepOffset {
        match self {
            Direction::Up => StepOffset::new(0, -1),
            Direction::Down => StepOffset::new(0, 1),
            Direction::Left => StepOffset::new(-1, 0),
            Direction::Right => StepOffset::new(1, 0),
        }
    }

    /// Maps a unit offset back to its direction, if the offset is cardinal.
    #[must_use]
    pub fn from_offset(offset: StepOffset) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.offset() == offset)
    }

    const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// First step of a path expressed as a pair of tile deltas in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepOffset {
    dx: i32,
    dy: i32,
}

impl StepOffset {
    /// Offset that leaves an entity on its current tile.
    pub const ZERO: StepOffset = StepOffset::new(0, 0);

    /// Creates a new step offset from raw deltas.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal tile delta.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical tile delta.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Reports whether the offset produces no movement.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Integer tile coordinate.
///
/// Components are signed so that out-of-bounds probes (for example a
/// pathfinding start of `(-1, 1)`) are representable; the world guarantees
/// that every coordinate it stores lies inside the configured grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePoint {
    x: i32,
    y: i32,
}

impl TilePoint {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Tile reached by applying the provided offset.
    #[must_use]
    pub const fn offset_by(self, offset: StepOffset) -> TilePoint {
        TilePoint::new(self.x + offset.dx(), self.y + offset.dy())
    }

    /// Reports whether the tile lies inside a `width x height` grid.
    #[must_use]
    pub fn in_bounds(self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && (self.x as u32) < width
            && (self.y as u32) < height
    }

    /// Computes the Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan_distance(self, other: TilePoint) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Fractional position of an entity while it interpolates between tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from fractional tile coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Position centered on the provided tile.
    #[must_use]
    pub fn from_tile(tile: TilePoint) -> Self {
        Self::new(tile.x() as f32, tile.y() as f32)
    }

    /// Horizontal coordinate in tile units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in tile units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Nearest whole tile to this position.
    #[must_use]
    pub fn tile(&self) -> TilePoint {
        TilePoint::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Reports whether both coordinates sit within the alignment tolerance of
    /// an integer tile boundary.
    #[must_use]
    pub fn is_tile_aligned(&self) -> bool {
        (self.x - self.x.round()).abs() <= TILE_ALIGNMENT_TOLERANCE
            && (self.y - self.y.round()).abs() <= TILE_ALIGNMENT_TOLERANCE
    }

    /// Euclidean distance to another position in tile units.
    #[must_use]
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Unique identifier assigned to a live entity by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Terminal status of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player met a configured win condition.
    Win,
    /// The player met a configured loss condition.
    Loss,
    /// No terminal condition has been met yet.
    Ongoing,
}

/// Named cheat triggers supplied by the input collaborator.
///
/// Each trigger is edge-triggered: it appears in at most one input snapshot
/// per activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheatAction {
    /// Grants the player one extra life.
    AddLife,
    /// Toggles the paused state of the session.
    Pause,
    /// Ends the current game immediately with a win.
    NextLevel,
    /// Restores the initial entity placements and zeroes progress.
    Reset,
    /// Multiplies the simulation speed applied to each tick.
    SpeedUp,
}

/// Snapshot of the currently active directional and cheat inputs for one tick.
#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    pressed: [bool; 4],
    cheats: Vec<CheatAction>,
}

impl InputSnapshot {
    /// Creates an empty snapshot with no active inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pressed directional input.
    pub fn press(&mut self, direction: Direction) {
        self.pressed[direction.index()] = true;
    }

    /// Reports whether the provided directional input is active.
    #[must_use]
    pub fn is_pressed(&self, direction: Direction) -> bool {
        self.pressed[direction.index()]
    }

    /// First active direction in the fixed evaluation order, if any.
    #[must_use]
    pub fn first_pressed(&self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.is_pressed(*direction))
    }

    /// Records an edge-triggered cheat activation.
    pub fn trigger(&mut self, cheat: CheatAction) {
        self.cheats.push(cheat);
    }

    /// Cheat triggers activated during this snapshot, in activation order.
    #[must_use]
    pub fn cheats(&self) -> &[CheatAction] {
        &self.cheats
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that a configured entity type be instantiated.
    SpawnEntity {
        /// Name of the entity type to instantiate.
        kind: String,
        /// Tile the entity should initially occupy.
        at: TilePoint,
        /// Mode the entity starts in.
        mode: String,
    },
    /// Requests that an entity begin moving one tile in the given direction.
    MoveEntity {
        /// Identifier of the entity attempting to move.
        id: EntityId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Clears an entity's heading, stopping it for the remainder of the tick.
    HaltEntity {
        /// Identifier of the entity to halt.
        id: EntityId,
    },
    /// Advances the simulation clock and integrates in-flight movement.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Switches an entity to a different named mode.
    SetMode {
        /// Identifier of the entity changing mode.
        id: EntityId,
        /// Name of the mode to activate.
        mode: String,
    },
    /// Adds a signed amount to the score.
    AddScore {
        /// Signed score delta.
        amount: i64,
    },
    /// Adds a signed amount to the remaining lives.
    AddLives {
        /// Signed lives delta.
        amount: i64,
    },
    /// Marks a single entity for removal at the next sweep.
    MarkForRemoval {
        /// Identifier of the entity to remove.
        id: EntityId,
    },
    /// Marks every entity of the named type for removal at the next sweep.
    RemoveAllOfKind {
        /// Name of the entity type to remove.
        kind: String,
    },
    /// Compacts the entity collection, dropping every marked entity.
    SweepRemovals,
    /// Resets an entity's position to its configured spawn tile.
    ReturnToSpawn {
        /// Identifier of the entity to reset.
        id: EntityId,
    },
    /// Latches the terminal outcome of the game.
    EndGame {
        /// Outcome the game ended with.
        outcome: Outcome,
    },
    /// Restores the initial placements and zeroes score, lives and time.
    ResetWorld,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an entity was instantiated.
    EntitySpawned {
        /// Identifier assigned to the new entity.
        id: EntityId,
        /// Name of the entity's type.
        kind: String,
        /// Tile the entity occupies after spawning.
        at: TilePoint,
    },
    /// Confirms that an entity finished a step onto a new tile.
    EntityMoved {
        /// Identifier of the entity that moved.
        id: EntityId,
        /// Tile the entity occupied before the step.
        from: TilePoint,
        /// Tile the entity occupies after the step.
        to: TilePoint,
    },
    /// Confirms that an entity was removed during a sweep.
    EntityRemoved {
        /// Identifier of the removed entity.
        id: EntityId,
        /// Name of the removed entity's type.
        kind: String,
    },
    /// Confirms that an entity switched modes.
    ModeChanged {
        /// Identifier of the entity that changed mode.
        id: EntityId,
        /// Mode the entity left.
        from: String,
        /// Mode the entity entered.
        to: String,
    },
    /// Reports the score after a mutation.
    ScoreChanged {
        /// Score value after the mutation.
        score: i64,
    },
    /// Reports the remaining lives after a mutation.
    LivesChanged {
        /// Lives value after the mutation.
        lives: i64,
    },
    /// Announces that the game reached a terminal outcome.
    GameEnded {
        /// Outcome the game ended with.
        outcome: Outcome,
    },
    /// Announces that the world was restored to its initial placements.
    WorldReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_offsets_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_offset(direction.offset()), Some(direction));
        }
        assert_eq!(Direction::from_offset(StepOffset::ZERO), None);
        assert_eq!(Direction::from_offset(StepOffset::new(1, 1)), None);
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = TilePoint::new(1, 1);
        let destination = TilePoint::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn bounds_reject_negative_and_oversized_coordinates() {
        assert!(TilePoint::new(0, 0).in_bounds(3, 3));
        assert!(TilePoint::new(2, 2).in_bounds(3, 3));
        assert!(!TilePoint::new(-1, 1).in_bounds(3, 3));
        assert!(!TilePoint::new(3, 1).in_bounds(3, 3));
    }

    #[test]
    fn alignment_uses_tolerance() {
        assert!(Position::new(2.0, 3.0).is_tile_aligned());
        assert!(Position::new(2.0005, 3.0).is_tile_aligned());
        assert!(!Position::new(2.4, 3.0).is_tile_aligned());
    }

    #[test]
    fn first_pressed_follows_fixed_order() {
        let mut input = InputSnapshot::new();
        assert_eq!(input.first_pressed(), None);
        input.press(Direction::Right);
        input.press(Direction::Down);
        assert_eq!(input.first_pressed(), Some(Direction::Down));
    }

    #[test]
    fn tile_point_round_trips_through_bincode() {
        let tile = TilePoint::new(7, -2);
        let bytes = bincode::serialize(&tile).expect("serialize");
        let restored: TilePoint = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, tile);
    }

    #[test]
    fn outcome_round_trips_through_bincode() {
        let bytes = bincode::serialize(&Outcome::Win).expect("serialize");
        let restored: Outcome = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, Outcome::Win);
    }
}
