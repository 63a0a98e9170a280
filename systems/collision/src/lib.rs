#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision detection and rule-driven resolution.
//!
//! Entities collide when they occupy the same tile. Each detected pair is
//! matched against the configured rule table; a matched rule carries one
//! ordered effect list per side, and each effect is translated into world
//! commands. A pair with no matching rule is a no-op, not an error. Effect
//! records are resolved into executable effects once when the rule book is
//! built, never per collision.

use tilerunner_core::{
    config::{CollisionEvent, CollisionRule},
    Command, EntityId,
};
use tilerunner_world::query::{EntitySnapshot, EntityView};

/// Collision rule table with effect lists resolved at construction.
#[derive(Clone, Debug, Default)]
pub struct RuleBook {
    rules: Vec<ResolvedRule>,
}

#[derive(Clone, Debug)]
struct ResolvedRule {
    kind_a: String,
    modes_a: Vec<String>,
    kind_b: String,
    modes_b: Vec<String>,
    effects_a: Vec<CollisionEvent>,
    effects_b: Vec<CollisionEvent>,
}

impl RuleBook {
    /// Resolves every configured rule's effect records into executable form.
    #[must_use]
    pub fn new(rules: &[CollisionRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| ResolvedRule {
                kind_a: rule.kind_a.clone(),
                modes_a: rule.modes_a.clone(),
                kind_b: rule.kind_b.clone(),
                modes_b: rule.modes_b.clone(),
                effects_a: rule.effects_a.iter().map(CollisionEvent::resolve).collect(),
                effects_b: rule.effects_b.iter().map(CollisionEvent::resolve).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Looks up the first rule matching the pair in either orientation.
    ///
    /// The returned effect lists are ordered to match the argument order, so
    /// `(a, b)` and `(b, a)` yield the same net resolution with the lists
    /// swapped.
    fn effects_for(
        &self,
        a: &EntitySnapshot,
        b: &EntitySnapshot,
    ) -> Option<(&[CollisionEvent], &[CollisionEvent])> {
        for rule in &self.rules {
            if rule.matches_side_a(a) && rule.matches_side_b(b) {
                return Some((&rule.effects_a, &rule.effects_b));
            }
            if rule.matches_side_a(b) && rule.matches_side_b(a) {
                return Some((&rule.effects_b, &rule.effects_a));
            }
        }
        None
    }
}

impl ResolvedRule {
    fn matches_side_a(&self, entity: &EntitySnapshot) -> bool {
        entity.kind.name() == self.kind_a && mode_matches(&self.modes_a, &entity.mode)
    }

    fn matches_side_b(&self, entity: &EntitySnapshot) -> bool {
        entity.kind.name() == self.kind_b && mode_matches(&self.modes_b, &entity.mode)
    }
}

fn mode_matches(modes: &[String], mode: &str) -> bool {
    modes.is_empty() || modes.iter().any(|candidate| candidate == mode)
}

/// Pure system that resolves same-tile entity pairs into world commands.
#[derive(Clone, Debug, Default)]
pub struct Collisions {
    rules: RuleBook,
}

impl Collisions {
    /// Creates a resolver over the configured rule table.
    #[must_use]
    pub fn new(rules: &[CollisionRule]) -> Self {
        Self {
            rules: RuleBook::new(rules),
        }
    }

    /// Scans the view for colliding pairs and emits their resolution.
    ///
    /// Removal effects only mark entities; the compaction sweep runs after
    /// every pair has been resolved, so a scan never observes a half-removed
    /// collection.
    pub fn handle(&self, view: &EntityView, out: &mut Vec<Command>) {
        let entities: Vec<&EntitySnapshot> =
            view.iter().filter(|entity| !entity.marked).collect();

        for (index, a) in entities.iter().enumerate() {
            for b in &entities[index + 1..] {
                if a.tile() != b.tile() {
                    continue;
                }
                if let Some((effects_a, effects_b)) = self.rules.effects_for(a, b) {
                    emit_effects(effects_a, a.id, b.id, out);
                    emit_effects(effects_b, b.id, a.id, out);
                }
            }
        }
    }
}

fn emit_effects(
    effects: &[CollisionEvent],
    owner: EntityId,
    opposite: EntityId,
    out: &mut Vec<Command>,
) {
    for effect in effects {
        match effect {
            CollisionEvent::Stop => out.push(Command::HaltEntity { id: owner }),
            CollisionEvent::Consume => out.push(Command::MarkForRemoval { id: opposite }),
            CollisionEvent::UpdateScore(amount) => {
                out.push(Command::AddScore { amount: *amount });
            }
            CollisionEvent::UpdateLives(amount) => {
                out.push(Command::AddLives { amount: *amount });
            }
            CollisionEvent::RemoveAllEntitiesOfType(kind) => {
                out.push(Command::RemoveAllOfKind { kind: kind.clone() });
            }
            CollisionEvent::ReturnToSpawnLocation => {
                out.push(Command::ReturnToSpawn { id: owner });
            }
        }
    }
}
