#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tilerunner.
//!
//! The world owns the tile grid, the entity collection and the shared game
//! state. All mutation flows through [`apply`]; systems observe the world
//! exclusively through the read-only views in [`query`] and the [`Event`]
//! values broadcast after each command. Entity removal is two-phase: commands
//! only mark entities, and a single [`Command::SweepRemovals`] compacts the
//! collection once no scan is in progress.

use std::sync::Arc;

use tracing::warn;

use tilerunner_core::{
    config::{ConfigError, EntityType},
    Command, Direction, EntityId, Event, Outcome, Position, TilePoint, TILE_ALIGNMENT_TOLERANCE,
};

/// Immutable description of the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Creates a new grid description.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the tile lies inside the grid bounds.
    #[must_use]
    pub fn contains(&self, tile: TilePoint) -> bool {
        tile.in_bounds(self.width, self.height)
    }
}

/// Initial entity placement consumed by [`World::new`].
#[derive(Clone, Debug)]
pub struct SeedPlacement {
    /// Name of the entity type to instantiate.
    pub kind: String,
    /// Tile the entity starts on.
    pub at: TilePoint,
    /// Mode the entity starts in.
    pub mode: String,
}

/// Everything required to construct a world for one game session.
#[derive(Clone, Debug)]
pub struct WorldSeed {
    /// Number of tile columns in the grid.
    pub grid_width: u32,
    /// Number of tile rows in the grid.
    pub grid_height: u32,
    /// Lives the player starts with.
    pub initial_lives: i64,
    /// Resolved entity type templates, shared for the session's lifetime.
    pub types: Vec<Arc<EntityType>>,
    /// Entities present when the game starts.
    pub placements: Vec<SeedPlacement>,
}

/// Represents the authoritative Tilerunner world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    types: Vec<Arc<EntityType>>,
    entities: Vec<Entity>,
    next_entity: u32,
    state: GameState,
    status: Outcome,
    initial_lives: i64,
    initial_placements: Vec<SeedPlacement>,
}

impl World {
    /// Creates a new world ready for simulation.
    ///
    /// Placement validation happens here, at load time: a placement naming an
    /// undeclared entity type or mode is a fatal [`ConfigError`].
    pub fn new(seed: WorldSeed) -> Result<Self, ConfigError> {
        let mut world = Self {
            grid: Grid::new(seed.grid_width, seed.grid_height),
            types: seed.types,
            entities: Vec::new(),
            next_entity: 0,
            state: GameState {
                score: 0,
                lives: seed.initial_lives,
                elapsed_seconds: 0.0,
                high_score: 0,
            },
            status: Outcome::Ongoing,
            initial_lives: seed.initial_lives,
            initial_placements: seed.placements,
        };

        for placement in world.initial_placements.clone() {
            let kind = world.entity_type(&placement.kind).cloned().ok_or(
                ConfigError::UnknownEntityType {
                    name: placement.kind.clone(),
                },
            )?;
            if !kind.has_mode(&placement.mode) {
                return Err(ConfigError::UnknownMode {
                    kind: placement.kind.clone(),
                    mode: placement.mode.clone(),
                });
            }
            let _ = world.spawn(kind, placement.at, placement.mode);
        }

        Ok(world)
    }

    /// Looks up a resolved entity type template by name.
    #[must_use]
    pub fn entity_type(&self, name: &str) -> Option<&Arc<EntityType>> {
        self.types.iter().find(|kind| kind.name() == name)
    }

    fn spawn(&mut self, kind: Arc<EntityType>, at: TilePoint, mode: String) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity = self.next_entity.saturating_add(1);
        self.entities.push(Entity {
            id,
            kind,
            position: Position::from_tile(at),
            facing: Direction::Up,
            heading: None,
            mode,
            spawn: at,
            last_tile: at,
            marked: false,
        });
        id
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    fn integrate_movement(&mut self, dt: f64, out_events: &mut Vec<Event>) {
        for entity in &mut self.entities {
            let Some(heading) = entity.heading else {
                continue;
            };

            let speed = entity.kind.speed();
            if speed <= 0.0 {
                entity.heading = None;
                continue;
            }

            // The bounds check works on the movement axis directly, so it
            // holds even for an entity misaligned on the other axis.
            let target = step_target(entity.position, heading);
            let limit = match heading {
                Direction::Up | Direction::Down => self.grid.height(),
                Direction::Left | Direction::Right => self.grid.width(),
            };
            if target < 0.0 || target > limit.saturating_sub(1) as f32 {
                entity.heading = None;
                continue;
            }

            let step = speed * dt as f32;
            let (moved, arrived) = advance(entity.position, heading, step);
            entity.position = moved;
            if arrived {
                entity.heading = None;
            }

            let to_tile = entity.position.tile();
            if to_tile != entity.last_tile {
                out_events.push(Event::EntityMoved {
                    id: entity.id,
                    from: entity.last_tile,
                    to: to_tile,
                });
                entity.last_tile = to_tile;
            }
        }
    }

    fn sweep_removals(&mut self, out_events: &mut Vec<Event>) {
        if self.entities.iter().all(|entity| !entity.marked) {
            return;
        }

        let removed: Vec<(EntityId, String)> = self
            .entities
            .iter()
            .filter(|entity| entity.marked)
            .map(|entity| (entity.id, entity.kind.name().to_owned()))
            .collect();

        self.entities.retain(|entity| !entity.marked);

        for (id, kind) in removed {
            out_events.push(Event::EntityRemoved { id, kind });
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.entities.clear();
        self.next_entity = 0;
        self.state.score = 0;
        self.state.lives = self.initial_lives;
        self.state.elapsed_seconds = 0.0;
        self.status = Outcome::Ongoing;

        for placement in self.initial_placements.clone() {
            // Validated in `new`; a miss here would be a broken invariant.
            if let Some(kind) = self.entity_type(&placement.kind).cloned() {
                let _ = self.spawn(kind, placement.at, placement.mode);
            }
        }

        out_events.push(Event::WorldReset);
    }
}

/// Boundary coordinate the heading is moving toward along its axis.
fn step_target(position: Position, heading: Direction) -> f32 {
    match heading {
        Direction::Up => next_boundary(position.y(), -1.0),
        Direction::Down => next_boundary(position.y(), 1.0),
        Direction::Left => next_boundary(position.x(), -1.0),
        Direction::Right => next_boundary(position.x(), 1.0),
    }
}

/// Moves a position one increment along the heading, clamping at the next
/// tile boundary so an entity completes one tile-to-tile transition at a
/// time. Returns the new position and whether the boundary was reached.
fn advance(position: Position, heading: Direction, step: f32) -> (Position, bool) {
    let value = match heading {
        Direction::Up | Direction::Down => position.y(),
        Direction::Left | Direction::Right => position.x(),
    };
    let target = step_target(position, heading);

    let remaining = (target - value).abs();
    let (next_value, arrived) = if step >= remaining {
        (target, true)
    } else {
        (value + step.copysign(target - value), false)
    };

    let moved = match heading {
        Direction::Up | Direction::Down => Position::new(position.x(), next_value),
        Direction::Left | Direction::Right => Position::new(next_value, position.y()),
    };
    (moved, arrived)
}

/// Next integer boundary from `value` in the provided axis direction.
fn next_boundary(value: f32, sign: f32) -> f32 {
    let rounded = value.round();
    if (value - rounded).abs() <= TILE_ALIGNMENT_TOLERANCE {
        rounded + sign
    } else if sign > 0.0 {
        value.ceil()
    } else {
        value.floor()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnEntity { kind, at, mode } => {
            let Some(template) = world.entity_type(&kind).cloned() else {
                warn!(kind = kind.as_str(), "spawn command for unknown entity type");
                return;
            };
            if !template.has_mode(&mode) {
                warn!(
                    kind = kind.as_str(),
                    mode = mode.as_str(),
                    "spawn command for unknown mode"
                );
                return;
            }
            let id = world.spawn(template, at, mode);
            out_events.push(Event::EntitySpawned { id, kind, at });
        }
        Command::MoveEntity { id, direction } => {
            if let Some(entity) = world.entity_mut(id) {
                entity.heading = Some(direction);
                entity.facing = direction;
            }
        }
        Command::HaltEntity { id } => {
            if let Some(entity) = world.entity_mut(id) {
                entity.heading = None;
            }
        }
        Command::Tick { dt } => {
            let seconds = dt.as_secs_f64();
            world.state.elapsed_seconds += seconds;
            out_events.push(Event::TimeAdvanced { dt });
            world.integrate_movement(seconds, out_events);
        }
        Command::SetMode { id, mode } => {
            if let Some(entity) = world.entity_mut(id) {
                if !entity.kind.has_mode(&mode) {
                    warn!(
                        kind = entity.kind.name(),
                        mode = mode.as_str(),
                        "mode change to unknown mode ignored"
                    );
                    return;
                }
                if entity.mode != mode {
                    let from = std::mem::replace(&mut entity.mode, mode.clone());
                    out_events.push(Event::ModeChanged {
                        id,
                        from,
                        to: mode,
                    });
                }
            }
        }
        Command::AddScore { amount } => {
            world.state.score += amount;
            if world.state.score > world.state.high_score {
                world.state.high_score = world.state.score;
            }
            out_events.push(Event::ScoreChanged {
                score: world.state.score,
            });
        }
        Command::AddLives { amount } => {
            // Lives may go negative; clamping is the outcome evaluator's call.
            world.state.lives += amount;
            out_events.push(Event::LivesChanged {
                lives: world.state.lives,
            });
        }
        Command::MarkForRemoval { id } => {
            if let Some(entity) = world.entity_mut(id) {
                entity.marked = true;
            }
        }
        Command::RemoveAllOfKind { kind } => {
            for entity in &mut world.entities {
                if entity.kind.name() == kind {
                    entity.marked = true;
                }
            }
        }
        Command::SweepRemovals => {
            world.sweep_removals(out_events);
        }
        Command::ReturnToSpawn { id } => {
            if let Some(entity) = world.entity_mut(id) {
                entity.position = Position::from_tile(entity.spawn);
                entity.heading = None;
                // A teleport, not a step; no `EntityMoved` is broadcast.
                entity.last_tile = entity.spawn;
            }
        }
        Command::EndGame { outcome } => {
            if world.status == Outcome::Ongoing && outcome != Outcome::Ongoing {
                world.status = outcome;
                out_events.push(Event::GameEnded { outcome });
            }
        }
        Command::ResetWorld => {
            world.reset(out_events);
        }
    }
}

#[derive(Debug)]
struct GameState {
    score: i64,
    lives: i64,
    elapsed_seconds: f64,
    high_score: i64,
}

#[derive(Clone, Debug)]
struct Entity {
    id: EntityId,
    kind: Arc<EntityType>,
    position: Position,
    facing: Direction,
    heading: Option<Direction>,
    mode: String,
    spawn: TilePoint,
    // Last tile reported through `EntityMoved`; the step origin for the
    // next transition regardless of how the tick was sliced.
    last_tile: TilePoint,
    marked: bool,
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::sync::Arc;

    use super::{Grid, World};
    use tilerunner_core::{
        config::{EntityType, ModeBundle},
        Direction, EntityId, Outcome, Position, TilePoint,
    };

    /// Provides the grid description for spatial queries.
    #[must_use]
    pub fn grid(world: &World) -> Grid {
        world.grid
    }

    /// Captures the shared game state for this tick.
    #[must_use]
    pub fn game_state(world: &World) -> GameStateSnapshot {
        GameStateSnapshot {
            score: world.state.score,
            lives: world.state.lives,
            elapsed_seconds: world.state.elapsed_seconds,
            high_score: world.state.high_score,
            status: world.status,
        }
    }

    /// Captures a read-only view of the live entity collection.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        let mut snapshots: Vec<EntitySnapshot> = world
            .entities
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id,
                kind: entity.kind.clone(),
                position: entity.position,
                facing: entity.facing,
                heading: entity.heading,
                mode: entity.mode.clone(),
                spawn: entity.spawn,
                marked: entity.marked,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        EntityView { snapshots }
    }

    /// Immutable representation of the shared game state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GameStateSnapshot {
        /// Current score.
        pub score: i64,
        /// Remaining lives; may be negative until the outcome evaluator acts.
        pub lives: i64,
        /// Simulated seconds elapsed since the session started.
        pub elapsed_seconds: f64,
        /// Highest score observed during the session.
        pub high_score: i64,
        /// Terminal status latched by the outcome evaluator.
        pub status: Outcome,
    }

    /// Immutable representation of a single entity's state used for queries.
    #[derive(Clone, Debug)]
    pub struct EntitySnapshot {
        /// Unique identifier assigned to the entity.
        pub id: EntityId,
        /// Shared template describing the entity's modes and speed.
        pub kind: Arc<EntityType>,
        /// Fractional position in tile units.
        pub position: Position,
        /// Direction the entity currently faces.
        pub facing: Direction,
        /// Direction of the in-flight step, if any.
        pub heading: Option<Direction>,
        /// Name of the entity's current mode.
        pub mode: String,
        /// Tile the entity originally spawned on.
        pub spawn: TilePoint,
        /// Whether the entity is marked for the next removal sweep.
        pub marked: bool,
    }

    impl EntitySnapshot {
        /// Nearest whole tile to the entity's position.
        #[must_use]
        pub fn tile(&self) -> TilePoint {
            self.position.tile()
        }

        /// Behavior bundle for the entity's current mode.
        #[must_use]
        pub fn bundle(&self) -> Option<&ModeBundle> {
            self.kind.mode(&self.mode)
        }
    }

    /// Read-only snapshot describing all live entities.
    #[derive(Clone, Debug, Default)]
    pub struct EntityView {
        snapshots: Vec<EntitySnapshot>,
    }

    impl EntityView {
        /// Creates a view from pre-captured snapshots; used by system tests.
        #[must_use]
        pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
            snapshots.sort_by_key(|snapshot| snapshot.id);
            Self { snapshots }
        }

        /// Iterator over the captured snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
            self.snapshots.iter()
        }

        /// Snapshot for the provided entity, if it is alive.
        #[must_use]
        pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
            self.snapshots
                .binary_search_by_key(&id, |snapshot| snapshot.id)
                .ok()
                .map(|index| &self.snapshots[index])
        }

        /// First live entity of the named type in iteration order.
        #[must_use]
        pub fn first_of_kind(&self, kind: &str) -> Option<&EntitySnapshot> {
            self.snapshots
                .iter()
                .find(|snapshot| snapshot.kind.name() == kind)
        }

        /// Number of live entities of the named type.
        #[must_use]
        pub fn count_of_kind(&self, kind: &str) -> usize {
            self.snapshots
                .iter()
                .filter(|snapshot| snapshot.kind.name() == kind)
                .count()
        }

        /// Reports whether any entity whose type appears in `blocks`
        /// occupies the provided tile.
        #[must_use]
        pub fn blocks_tile(&self, blocks: &[String], tile: TilePoint) -> bool {
            if blocks.is_empty() {
                return false;
            }
            self.snapshots.iter().any(|snapshot| {
                snapshot.tile() == tile
                    && blocks.iter().any(|kind| kind == snapshot.kind.name())
            })
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EntitySnapshot> {
            self.snapshots
        }
    }
}
