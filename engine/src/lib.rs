#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration: the fixed-order tick loop.
//!
//! A [`Session`] owns the authoritative world and every behavior system,
//! built once from an already-parsed game configuration. Each call to
//! [`Session::tick`] runs the systems in a fixed order, applying their
//! commands to the world between stages:
//!
//! 1. cheat triggers from the input snapshot
//! 2. spawn/despawn evaluation
//! 3. movement control
//! 4. time and movement integration
//! 5. collision detection and resolution
//! 6. mode transitions
//! 7. outcome evaluation
//!
//! Removal is two-phase throughout: systems only mark entities, and the
//! session compacts the collection between stages, so no stage ever scans a
//! half-removed collection. The session stops simulating once the game has
//! ended or while paused; cheat triggers keep working in both states.

use std::time::Duration;

use tracing::info;

use tilerunner_core::{
    config::{ConfigError, EntityType, GameConfig},
    CheatAction, Command, Event, InputSnapshot, Outcome,
};
use tilerunner_system_collision::Collisions;
use tilerunner_system_control::Control;
use tilerunner_system_modes::ModeTransitions;
use tilerunner_system_outcome::OutcomeEvaluator;
use tilerunner_system_spawning::Spawning;
use tilerunner_world::{self as world, query, SeedPlacement, World, WorldSeed};

/// Multiplier applied to the tick duration per speed-up cheat trigger.
const SPEED_UP_FACTOR: f64 = 1.5;

/// A running game session: world, systems, and tick bookkeeping.
pub struct Session {
    config: GameConfig,
    world: World,
    control: Control,
    collisions: Collisions,
    modes: ModeTransitions,
    spawning: Spawning,
    outcome: OutcomeEvaluator,
    paused: bool,
    speed_factor: f64,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    /// Builds a session from an already-parsed game configuration.
    ///
    /// Strategy resolution happens here, once: an unknown control or target
    /// strategy name, an empty mode table, or a placement referencing an
    /// unknown type or mode is a fatal configuration error.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let world = build_world(&config)?;
        let collisions = Collisions::new(&config.collision_rules);
        let modes = ModeTransitions::new(config.mode_changes.clone());
        let spawning = Spawning::new(config.spawn_events.clone());
        let outcome = OutcomeEvaluator::new(config.outcomes.clone());
        Ok(Self {
            config,
            world,
            control: Control::new(),
            collisions,
            modes,
            spawning,
            outcome,
            paused: false,
            speed_factor: 1.0,
            events: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Advances the simulation by one tick.
    ///
    /// Events emitted by the world during the tick are collected and remain
    /// readable through [`Session::events`] until the next call.
    pub fn tick(&mut self, dt: Duration, input: &InputSnapshot) {
        self.events.clear();

        for action in input.cheats() {
            self.apply_cheat(*action);
        }

        if self.paused || self.outcome() != Outcome::Ongoing {
            return;
        }

        let dt = dt.mul_f64(self.speed_factor);

        let mark = self.events.len();
        self.spawning
            .handle(&query::game_state(&self.world), &mut self.commands);
        self.apply_commands();
        self.apply(Command::SweepRemovals);
        self.spawning.observe(&self.events[mark..]);

        {
            let view = query::entity_view(&self.world);
            let grid = query::grid(&self.world);
            self.control.handle(input, &view, grid, &mut self.commands);
        }
        self.apply_commands();

        self.apply(Command::Tick { dt });

        {
            let view = query::entity_view(&self.world);
            self.collisions.handle(&view, &mut self.commands);
        }
        self.apply_commands();
        self.apply(Command::SweepRemovals);

        {
            let state = query::game_state(&self.world);
            let view = query::entity_view(&self.world);
            self.modes.handle(&state, &view, &mut self.commands);
        }
        self.apply_commands();

        {
            let state = query::game_state(&self.world);
            let view = query::entity_view(&self.world);
            self.outcome.handle(&state, &view, &mut self.commands);
        }
        self.apply_commands();

        if self.outcome() != Outcome::Ongoing {
            info!(outcome = ?self.outcome(), "game ended");
        }
    }

    /// The authoritative world, for read-only queries by the host.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events the world broadcast during the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The latched terminal outcome, [`Outcome::Ongoing`] while running.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        query::game_state(&self.world).status
    }

    /// Whether the pause cheat currently suspends simulation.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Dispatch table for the named cheat triggers.
    fn apply_cheat(&mut self, action: CheatAction) {
        info!(?action, "cheat triggered");
        match action {
            CheatAction::AddLife => grant_life(self),
            CheatAction::Pause => toggle_pause(self),
            CheatAction::NextLevel => finish_level(self),
            CheatAction::Reset => reset_session(self),
            CheatAction::SpeedUp => speed_up(self),
        }
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn apply_commands(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}

fn grant_life(session: &mut Session) {
    session.apply(Command::AddLives { amount: 1 });
}

fn toggle_pause(session: &mut Session) {
    session.paused = !session.paused;
}

fn finish_level(session: &mut Session) {
    session.apply(Command::EndGame {
        outcome: Outcome::Win,
    });
}

/// Restores the initial placements and counters; the high score survives,
/// and the spawn/outcome bookkeeping starts over.
fn reset_session(session: &mut Session) {
    session.apply(Command::ResetWorld);
    session.spawning = Spawning::new(session.config.spawn_events.clone());
    session.outcome = OutcomeEvaluator::new(session.config.outcomes.clone());
    session.paused = false;
    session.speed_factor = 1.0;
}

fn speed_up(session: &mut Session) {
    session.speed_factor *= SPEED_UP_FACTOR;
}

fn build_world(config: &GameConfig) -> Result<World, ConfigError> {
    let types = config
        .entity_types
        .iter()
        .map(|spec| EntityType::resolve(spec).map(std::sync::Arc::new))
        .collect::<Result<Vec<_>, _>>()?;
    let placements = config
        .placements
        .iter()
        .map(|placement| SeedPlacement {
            kind: placement.kind.clone(),
            at: placement.at,
            mode: placement.mode.clone(),
        })
        .collect();
    World::new(WorldSeed {
        grid_width: config.grid_width,
        grid_height: config.grid_height,
        initial_lives: config.initial_lives,
        types,
        placements,
    })
}
