#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Conditional spawning and despawning of dynamic entities.
//!
//! Each configured spawn event carries a spawn condition and a despawn
//! condition, both evaluated against global game state. Unlike mode
//! transitions, these conditions are persistent thresholds: once elapsed
//! time or score crosses the line the condition stays true. The system owns
//! the once-only bookkeeping itself, so a persistent condition still spawns
//! exactly one entity, bound to its id through the spawn event broadcast.

use tracing::warn;

use tilerunner_core::{
    config::{Condition, ConditionKind, SpawnEvent},
    Command, EntityId, Event,
};
use tilerunner_world::query::GameStateSnapshot;

/// Pure system that instantiates and retires configured dynamic entities.
#[derive(Clone, Debug, Default)]
pub struct Spawning {
    trackers: Vec<Tracker>,
}

#[derive(Clone, Debug)]
struct Tracker {
    event: SpawnEvent,
    requested: bool,
    spawned: Option<EntityId>,
    despawned: bool,
}

impl Spawning {
    /// Creates the evaluator over the configured spawn event list.
    #[must_use]
    pub fn new(events: Vec<SpawnEvent>) -> Self {
        let trackers = events
            .into_iter()
            .map(|event| Tracker {
                event,
                requested: false,
                spawned: None,
                despawned: false,
            })
            .collect();
        Self { trackers }
    }

    /// Emits spawn and despawn commands for events whose condition holds.
    ///
    /// Each event spawns at most once and despawns at most once; the
    /// persistent conditions staying true on later ticks has no further
    /// effect.
    pub fn handle(&mut self, state: &GameStateSnapshot, out: &mut Vec<Command>) {
        for tracker in &mut self.trackers {
            if !tracker.requested && should_spawn(&tracker.event.spawn, state) {
                tracker.requested = true;
                out.push(Command::SpawnEntity {
                    kind: tracker.event.kind.clone(),
                    at: tracker.event.at,
                    mode: tracker.event.mode.clone(),
                });
            }

            if let Some(id) = tracker.spawned {
                if !tracker.despawned && should_despawn(&tracker.event.despawn, state) {
                    tracker.despawned = true;
                    out.push(Command::MarkForRemoval { id });
                }
            }
        }
    }

    /// Binds spawned entity ids from the world's event broadcast.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            let Event::EntitySpawned { id, kind, at } = event else {
                continue;
            };
            let unbound = self.trackers.iter_mut().find(|tracker| {
                tracker.requested
                    && tracker.spawned.is_none()
                    && tracker.event.kind == *kind
                    && tracker.event.at == *at
            });
            if let Some(tracker) = unbound {
                tracker.spawned = Some(*id);
            }
        }
    }
}

/// Evaluates a spawn condition: persistent thresholds, false on malformed
/// input.
#[must_use]
pub fn should_spawn(condition: &Condition, state: &GameStateSnapshot) -> bool {
    holds(condition, state)
}

/// Evaluates a despawn condition; semantics match [`should_spawn`].
#[must_use]
pub fn should_despawn(condition: &Condition, state: &GameStateSnapshot) -> bool {
    holds(condition, state)
}

fn holds(condition: &Condition, state: &GameStateSnapshot) -> bool {
    match condition.resolved_kind() {
        ConditionKind::TimeElapsed => match condition.amount() {
            Some(amount) => state.elapsed_seconds >= amount,
            None => {
                warn!(kind = condition.kind.as_str(), "condition missing amount");
                false
            }
        },
        ConditionKind::ScoreBased => match condition.amount() {
            Some(amount) => state.score as f64 >= amount,
            None => {
                warn!(kind = condition.kind.as_str(), "condition missing amount");
                false
            }
        },
        ConditionKind::Never => false,
        ConditionKind::Unknown => {
            warn!(kind = condition.kind.as_str(), "unknown condition kind");
            false
        }
    }
}
