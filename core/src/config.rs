//! Typed configuration model consumed by the engine.
//!
//! An external loader is responsible for file parsing and schema validation;
//! it produces the plain `*Spec` records in this module. Specs that select a
//! strategy by name are resolved exactly once: at session construction for
//! control strategies (where an unknown name is a fatal [`ConfigError`]) and
//! at rule-book construction for collision events (where an unknown kind
//! degrades to a default with a logged warning).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{Outcome, TilePoint};

/// Errors detected while resolving configuration into executable strategies.
///
/// Every variant is fatal at load time; none of them can occur during a tick.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A mode bundle names a control strategy outside the closed set.
    #[error("unknown control strategy `{name}` for entity type `{kind}`")]
    UnknownControlStrategy {
        /// Entity type whose bundle referenced the strategy.
        kind: String,
        /// Strategy name that failed to resolve.
        name: String,
    },
    /// A control strategy names a target calculation outside the closed set.
    #[error("unknown target strategy `{name}` for entity type `{kind}`")]
    UnknownTargetStrategy {
        /// Entity type whose bundle referenced the strategy.
        kind: String,
        /// Target strategy name that failed to resolve.
        name: String,
    },
    /// A conditional-radius strategy names an unknown maneuver.
    #[error("unknown maneuver `{name}` for entity type `{kind}`")]
    UnknownManeuver {
        /// Entity type whose bundle referenced the maneuver.
        kind: String,
        /// Maneuver name that failed to resolve.
        name: String,
    },
    /// A control strategy omits a parameter it requires.
    #[error("control strategy `{strategy}` for entity type `{kind}` is missing `{field}`")]
    MissingControlParameter {
        /// Entity type whose bundle is incomplete.
        kind: String,
        /// Strategy that required the parameter.
        strategy: String,
        /// Name of the missing parameter.
        field: &'static str,
    },
    /// An entity type declares no modes at all.
    #[error("entity type `{kind}` defines no modes")]
    EmptyModeTable {
        /// Entity type with the empty mode table.
        kind: String,
    },
    /// A placement or spawn event references an undeclared entity type.
    #[error("unknown entity type `{name}`")]
    UnknownEntityType {
        /// Entity type name that failed to resolve.
        name: String,
    },
    /// A placement or spawn event references a mode the type does not define.
    #[error("entity type `{kind}` has no mode named `{mode}`")]
    UnknownMode {
        /// Entity type that was referenced.
        kind: String,
        /// Mode name that failed to resolve.
        mode: String,
    },
}

/// Complete configuration bundle for one game, as produced by the loader.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of tile columns in the grid.
    pub grid_width: u32,
    /// Number of tile rows in the grid.
    pub grid_height: u32,
    /// Lives the player starts with.
    pub initial_lives: i64,
    /// Entity type templates available to this game.
    pub entity_types: Vec<EntityTypeSpec>,
    /// Entities present when the game starts.
    pub placements: Vec<InitialPlacement>,
    /// Collision rules keyed by unordered type/mode pairs.
    pub collision_rules: Vec<CollisionRule>,
    /// Conditionally spawned dynamic entities.
    pub spawn_events: Vec<SpawnEvent>,
    /// Conditional mode transitions.
    pub mode_changes: Vec<ModeChangeEvent>,
    /// Win and loss condition strategies.
    pub outcomes: Vec<OutcomeCondition>,
}

/// Entity type template as authored in configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityTypeSpec {
    /// Unique name of the entity type.
    pub name: String,
    /// Movement speed in tiles per second.
    pub speed: f32,
    /// Behavior bundles keyed by mode name.
    pub modes: BTreeMap<String, ModeBundleSpec>,
}

/// Per-mode behavior bundle as authored in configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModeBundleSpec {
    /// Movement control strategy selection.
    pub control: ControlSpec,
    /// Presentation descriptor forwarded to the rendering collaborator.
    pub visual: VisualDescriptor,
    /// Entity type names that block this entity's movement while in the mode.
    #[serde(default)]
    pub blocks: Vec<String>,
}

/// Presentation descriptor for one mode.
///
/// The engine never interprets this; it is carried through so the rendering
/// collaborator can resolve it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualDescriptor {
    /// Sprite or animation key understood by the renderer.
    pub sprite: String,
}

/// Raw control strategy selection keyed by name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ControlSpec {
    /// Name of the control strategy.
    pub strategy: String,
    /// Target calculation used by seeking strategies.
    #[serde(default)]
    pub target: Option<TargetSpec>,
    /// Switching radius for the conditional strategy, in tiles.
    #[serde(default)]
    pub radius: Option<f64>,
    /// Maneuver used while inside the radius.
    #[serde(default)]
    pub within: Option<String>,
    /// Maneuver used while outside the radius.
    #[serde(default)]
    pub outside: Option<String>,
}

/// Raw target calculation selection keyed by name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Name of the target strategy.
    pub strategy: String,
    /// Column literal for fixed locations.
    #[serde(default)]
    pub x: Option<i32>,
    /// Row literal for fixed locations.
    #[serde(default)]
    pub y: Option<i32>,
    /// Entity type tracked by the tracking strategies.
    #[serde(default)]
    pub kind: Option<String>,
    /// Teammate entity type used by the trap strategy.
    #[serde(default)]
    pub teammate: Option<String>,
    /// Tiles of lead applied ahead of the tracked entity.
    #[serde(default)]
    pub lead: Option<i32>,
}

/// Resolved movement control strategy for one mode.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlConfig {
    /// Movement follows the externally supplied input snapshot.
    Manual,
    /// Movement seeks a computed target via pathfinding.
    TargetSeeking {
        /// How the target tile is computed each tick.
        target: TargetConfig,
    },
    /// Movement switches between two maneuvers based on target distance.
    ConditionalRadius {
        /// Reference target the distance is measured against.
        target: TargetConfig,
        /// Switching radius in tiles.
        radius: f32,
        /// Maneuver while the target is within the radius.
        within: Maneuver,
        /// Maneuver while the target is outside the radius.
        outside: Maneuver,
    },
}

impl ControlConfig {
    /// Resolves a raw control spec into an executable strategy.
    ///
    /// Unknown strategy names are a fatal configuration error, per the
    /// load-time failure policy; they never surface during a tick.
    pub fn resolve(kind: &str, spec: &ControlSpec) -> Result<ControlConfig, ConfigError> {
        match spec.strategy.as_str() {
            "manual" => Ok(ControlConfig::Manual),
            "target_seeking" => Ok(ControlConfig::TargetSeeking {
                target: required_target(kind, spec)?,
            }),
            "conditional_radius" => {
                let radius = spec.radius.ok_or(ConfigError::MissingControlParameter {
                    kind: kind.to_owned(),
                    strategy: spec.strategy.clone(),
                    field: "radius",
                })? as f32;
                Ok(ControlConfig::ConditionalRadius {
                    target: required_target(kind, spec)?,
                    radius,
                    within: Maneuver::resolve(kind, spec.within.as_deref(), "within")?,
                    outside: Maneuver::resolve(kind, spec.outside.as_deref(), "outside")?,
                })
            }
            other => Err(ConfigError::UnknownControlStrategy {
                kind: kind.to_owned(),
                name: other.to_owned(),
            }),
        }
    }
}

fn required_target(kind: &str, spec: &ControlSpec) -> Result<TargetConfig, ConfigError> {
    let target = spec
        .target
        .as_ref()
        .ok_or(ConfigError::MissingControlParameter {
            kind: kind.to_owned(),
            strategy: spec.strategy.clone(),
            field: "target",
        })?;
    TargetConfig::resolve(kind, target)
}

/// Resolved target calculation strategy.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetConfig {
    /// A coordinate literal from configuration.
    FixedLocation {
        /// Tile to target.
        at: TilePoint,
    },
    /// The position of the first live entity of the named type.
    TrackEntity {
        /// Entity type to track.
        kind: String,
    },
    /// The tracked entity's position offset along its facing direction.
    TrackEntityWithLeadAhead {
        /// Entity type to track.
        kind: String,
        /// Tiles of lead ahead of the tracked entity.
        lead: i32,
    },
    /// A pincer position reflecting the lead tile about a teammate.
    TrackEntityWithTrap {
        /// Entity type to track.
        kind: String,
        /// Teammate entity type anchoring the reflection.
        teammate: String,
        /// Tiles of lead ahead of the tracked entity.
        lead: i32,
    },
}

impl TargetConfig {
    /// Resolves a raw target spec into an executable strategy.
    pub fn resolve(kind: &str, spec: &TargetSpec) -> Result<TargetConfig, ConfigError> {
        let tracked = || {
            spec.kind
                .clone()
                .ok_or(ConfigError::MissingControlParameter {
                    kind: kind.to_owned(),
                    strategy: spec.strategy.clone(),
                    field: "kind",
                })
        };
        match spec.strategy.as_str() {
            "fixed_location" => Ok(TargetConfig::FixedLocation {
                at: TilePoint::new(spec.x.unwrap_or(0), spec.y.unwrap_or(0)),
            }),
            "track_entity" => Ok(TargetConfig::TrackEntity { kind: tracked()? }),
            "track_entity_with_lead_ahead" => Ok(TargetConfig::TrackEntityWithLeadAhead {
                kind: tracked()?,
                lead: spec.lead.unwrap_or(0),
            }),
            "track_entity_with_trap" => Ok(TargetConfig::TrackEntityWithTrap {
                kind: tracked()?,
                teammate: spec.teammate.clone().ok_or(
                    ConfigError::MissingControlParameter {
                        kind: kind.to_owned(),
                        strategy: spec.strategy.clone(),
                        field: "teammate",
                    },
                )?,
                lead: spec.lead.unwrap_or(0),
            }),
            other => Err(ConfigError::UnknownTargetStrategy {
                kind: kind.to_owned(),
                name: other.to_owned(),
            }),
        }
    }
}

/// Maneuver selected by the conditional-radius strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Maneuver {
    /// Pathfind toward the reference target.
    Approach,
    /// Step away from the reference target.
    Flee,
}

impl Maneuver {
    fn resolve(kind: &str, name: Option<&str>, field: &'static str) -> Result<Self, ConfigError> {
        match name {
            Some("approach") => Ok(Maneuver::Approach),
            Some("flee") => Ok(Maneuver::Flee),
            Some(other) => Err(ConfigError::UnknownManeuver {
                kind: kind.to_owned(),
                name: other.to_owned(),
            }),
            None => Err(ConfigError::MissingControlParameter {
                kind: kind.to_owned(),
                strategy: "conditional_radius".to_owned(),
                field,
            }),
        }
    }
}

/// Collision effect record as authored in configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionEventSpec {
    /// Name of the collision effect.
    pub kind: String,
    /// Signed amount for score and lives effects.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Entity type name for removal effects.
    #[serde(default)]
    pub target: Option<String>,
}

/// Resolved collision effect applied to one side of a colliding pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Zero the owning entity's velocity for this tick.
    Stop,
    /// Mark the opposite entity for removal.
    Consume,
    /// Add a signed amount to the score.
    UpdateScore(i64),
    /// Add a signed amount to the remaining lives.
    UpdateLives(i64),
    /// Mark every entity of the named type for removal.
    RemoveAllEntitiesOfType(String),
    /// Reset the owning entity to its configured spawn tile.
    ReturnToSpawnLocation,
}

impl CollisionEvent {
    /// Resolves a raw effect record into an executable effect.
    ///
    /// Unknown kinds and records missing a required parameter fall back to
    /// [`CollisionEvent::Consume`] with a logged warning; collision
    /// configuration never aborts the tick loop.
    #[must_use]
    pub fn resolve(spec: &CollisionEventSpec) -> CollisionEvent {
        match spec.kind.as_str() {
            "stop" => CollisionEvent::Stop,
            "consume" => CollisionEvent::Consume,
            "update_score" => match spec.amount {
                Some(amount) => CollisionEvent::UpdateScore(amount),
                None => fallback(spec, "amount"),
            },
            "update_lives" => match spec.amount {
                Some(amount) => CollisionEvent::UpdateLives(amount),
                None => fallback(spec, "amount"),
            },
            "remove_all_entities_of_type" => match &spec.target {
                Some(target) => CollisionEvent::RemoveAllEntitiesOfType(target.clone()),
                None => fallback(spec, "target"),
            },
            "return_to_spawn_location" => CollisionEvent::ReturnToSpawnLocation,
            other => {
                warn!(kind = other, "unknown collision event kind, using consume");
                CollisionEvent::Consume
            }
        }
    }
}

fn fallback(spec: &CollisionEventSpec, field: &str) -> CollisionEvent {
    warn!(
        kind = spec.kind.as_str(),
        field, "collision event missing parameter, using consume"
    );
    CollisionEvent::Consume
}

/// Collision rule keying an unordered type/mode pair to two effect lists.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollisionRule {
    /// Entity type on the first side of the pair.
    pub kind_a: String,
    /// Modes of the first side the rule applies to; empty matches any mode.
    #[serde(default)]
    pub modes_a: Vec<String>,
    /// Entity type on the second side of the pair.
    pub kind_b: String,
    /// Modes of the second side the rule applies to; empty matches any mode.
    #[serde(default)]
    pub modes_b: Vec<String>,
    /// Effects applied to the first side, in order.
    #[serde(default)]
    pub effects_a: Vec<CollisionEventSpec>,
    /// Effects applied to the second side, in order.
    #[serde(default)]
    pub effects_b: Vec<CollisionEventSpec>,
}

/// Named, parameterized predicate evaluated against live game state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Name of the condition kind.
    pub kind: String,
    /// Named numeric parameters.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl Condition {
    /// Builds a time-elapsed condition with the provided threshold seconds.
    #[must_use]
    pub fn time_elapsed(amount: f64) -> Self {
        Self::with_amount("time_elapsed", amount)
    }

    /// Builds a score-based condition with the provided threshold.
    #[must_use]
    pub fn score_based(amount: f64) -> Self {
        Self::with_amount("score_based", amount)
    }

    /// Builds the always-false condition used to disable an event.
    #[must_use]
    pub fn never() -> Self {
        Self {
            kind: "never".to_owned(),
            params: BTreeMap::new(),
        }
    }

    fn with_amount(kind: &str, amount: f64) -> Self {
        let mut params = BTreeMap::new();
        let _ = params.insert("amount".to_owned(), amount);
        Self {
            kind: kind.to_owned(),
            params,
        }
    }

    /// Closed dispatch over the known condition kinds.
    #[must_use]
    pub fn resolved_kind(&self) -> ConditionKind {
        match self.kind.as_str() {
            "time_elapsed" => ConditionKind::TimeElapsed,
            "score_based" => ConditionKind::ScoreBased,
            "never" => ConditionKind::Never,
            _ => ConditionKind::Unknown,
        }
    }

    /// The `amount` parameter, when present and finite.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        self.params
            .get("amount")
            .copied()
            .filter(|value| value.is_finite())
    }
}

/// Closed set of condition kinds the evaluators dispatch over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionKind {
    /// Fires based on elapsed game time.
    TimeElapsed,
    /// Fires based on the current score.
    ScoreBased,
    /// Never fires; explicit disable.
    Never,
    /// Name outside the closed set; evaluators treat it as false and warn.
    Unknown,
}

/// Configuration for a conditionally spawned dynamic entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpawnEvent {
    /// Entity type to instantiate.
    pub kind: String,
    /// Tile the entity spawns on.
    pub at: TilePoint,
    /// Mode the entity starts in.
    pub mode: String,
    /// Condition under which the entity spawns.
    pub spawn: Condition,
    /// Condition under which the spawned entity is removed.
    pub despawn: Condition,
}

/// Configuration for a conditional mode transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModeChangeEvent {
    /// Entity type the transition applies to.
    pub kind: String,
    /// Mode the entity must currently be in.
    pub from_mode: String,
    /// Mode the entity switches to.
    pub to_mode: String,
    /// Condition that triggers the switch.
    pub condition: Condition,
}

/// Entity present when the game starts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitialPlacement {
    /// Entity type to instantiate.
    pub kind: String,
    /// Tile the entity starts on.
    pub at: TilePoint,
    /// Mode the entity starts in.
    pub mode: String,
}

/// Terminal verdict attached to configurable outcome conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The condition ends the game in the player's favor.
    Win,
    /// The condition ends the game against the player.
    Loss,
}

impl Verdict {
    /// Converts the verdict into the terminal [`Outcome`] it produces.
    #[must_use]
    pub const fn outcome(self) -> Outcome {
        match self {
            Verdict::Win => Outcome::Win,
            Verdict::Loss => Outcome::Loss,
        }
    }
}

/// Win/lose condition strategies evaluated against game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OutcomeCondition {
    /// Loss once remaining lives drop to or below the minimum.
    LivesBased {
        /// Lives threshold, inclusive.
        minimum: i64,
    },
    /// Fixed verdict once elapsed time reaches the limit.
    TimeBased {
        /// Elapsed-time threshold in seconds, inclusive.
        limit_seconds: f64,
        /// Verdict produced when the limit is reached.
        verdict: Verdict,
    },
    /// Win once the score reaches the target.
    ScoreBased {
        /// Score threshold, inclusive.
        target: i64,
    },
    /// Fixed verdict once no entities of the named type remain.
    EntityCountBased {
        /// Entity type whose population is counted.
        kind: String,
        /// Verdict produced when the population reaches zero.
        verdict: Verdict,
    },
}

/// Immutable, shared entity type template with resolved strategies.
///
/// Many entity placements reference one `EntityType` behind an `Arc`; the
/// template lives for the length of the game session.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityType {
    name: String,
    speed: f32,
    modes: BTreeMap<String, ModeBundle>,
}

impl EntityType {
    /// Resolves a raw entity type spec, failing on unknown strategy names.
    pub fn resolve(spec: &EntityTypeSpec) -> Result<EntityType, ConfigError> {
        if spec.modes.is_empty() {
            return Err(ConfigError::EmptyModeTable {
                kind: spec.name.clone(),
            });
        }

        let mut modes = BTreeMap::new();
        for (mode_name, bundle) in &spec.modes {
            let resolved = ModeBundle {
                control: ControlConfig::resolve(&spec.name, &bundle.control)?,
                visual: bundle.visual.clone(),
                blocks: bundle.blocks.clone(),
            };
            let _ = modes.insert(mode_name.clone(), resolved);
        }

        Ok(EntityType {
            name: spec.name.clone(),
            speed: spec.speed,
            modes,
        })
    }

    /// Unique name of the entity type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Movement speed in tiles per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Behavior bundle for the named mode, if the type defines it.
    #[must_use]
    pub fn mode(&self, name: &str) -> Option<&ModeBundle> {
        self.modes.get(name)
    }

    /// Reports whether the type defines the named mode.
    #[must_use]
    pub fn has_mode(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }
}

/// Resolved per-mode behavior bundle.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeBundle {
    control: ControlConfig,
    visual: VisualDescriptor,
    blocks: Vec<String>,
}

impl ModeBundle {
    /// Movement control strategy active in this mode.
    #[must_use]
    pub const fn control(&self) -> &ControlConfig {
        &self.control
    }

    /// Presentation descriptor active in this mode.
    #[must_use]
    pub const fn visual(&self) -> &VisualDescriptor {
        &self.visual
    }

    /// Entity type names that block movement while in this mode.
    #[must_use]
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_bundle() -> ModeBundleSpec {
        ModeBundleSpec {
            control: ControlSpec {
                strategy: "manual".to_owned(),
                ..ControlSpec::default()
            },
            visual: VisualDescriptor::default(),
            blocks: Vec::new(),
        }
    }

    #[test]
    fn unknown_control_strategy_is_fatal() {
        let spec = ControlSpec {
            strategy: "teleporting".to_owned(),
            ..ControlSpec::default()
        };

        assert_eq!(
            ControlConfig::resolve("ghost", &spec),
            Err(ConfigError::UnknownControlStrategy {
                kind: "ghost".to_owned(),
                name: "teleporting".to_owned(),
            })
        );
    }

    #[test]
    fn conditional_radius_requires_all_parameters() {
        let spec = ControlSpec {
            strategy: "conditional_radius".to_owned(),
            target: Some(TargetSpec {
                strategy: "track_entity".to_owned(),
                kind: Some("player".to_owned()),
                ..TargetSpec::default()
            }),
            radius: Some(4.0),
            within: Some("flee".to_owned()),
            outside: None,
        };

        assert_eq!(
            ControlConfig::resolve("ghost", &spec),
            Err(ConfigError::MissingControlParameter {
                kind: "ghost".to_owned(),
                strategy: "conditional_radius".to_owned(),
                field: "outside",
            })
        );
    }

    #[test]
    fn unknown_collision_event_falls_back_to_consume() {
        let spec = CollisionEventSpec {
            kind: "explode".to_owned(),
            amount: None,
            target: None,
        };
        assert_eq!(CollisionEvent::resolve(&spec), CollisionEvent::Consume);
    }

    #[test]
    fn collision_event_missing_amount_falls_back_to_consume() {
        let spec = CollisionEventSpec {
            kind: "update_score".to_owned(),
            amount: None,
            target: None,
        };
        assert_eq!(CollisionEvent::resolve(&spec), CollisionEvent::Consume);
    }

    #[test]
    fn collision_events_resolve_known_kinds() {
        let score = CollisionEventSpec {
            kind: "update_score".to_owned(),
            amount: Some(10),
            target: None,
        };
        let removal = CollisionEventSpec {
            kind: "remove_all_entities_of_type".to_owned(),
            amount: None,
            target: Some("pellet".to_owned()),
        };
        assert_eq!(
            CollisionEvent::resolve(&score),
            CollisionEvent::UpdateScore(10)
        );
        assert_eq!(
            CollisionEvent::resolve(&removal),
            CollisionEvent::RemoveAllEntitiesOfType("pellet".to_owned())
        );
    }

    #[test]
    fn condition_amount_rejects_non_finite_values() {
        let mut condition = Condition::time_elapsed(5.0);
        assert_eq!(condition.amount(), Some(5.0));

        let _ = condition.params.insert("amount".to_owned(), f64::NAN);
        assert_eq!(condition.amount(), None);
    }

    #[test]
    fn condition_kind_dispatch_is_closed() {
        assert_eq!(
            Condition::time_elapsed(1.0).resolved_kind(),
            ConditionKind::TimeElapsed
        );
        assert_eq!(Condition::never().resolved_kind(), ConditionKind::Never);
        let exotic = Condition {
            kind: "lunar_phase".to_owned(),
            params: BTreeMap::new(),
        };
        assert_eq!(exotic.resolved_kind(), ConditionKind::Unknown);
    }

    #[test]
    fn entity_type_resolution_rejects_empty_mode_table() {
        let spec = EntityTypeSpec {
            name: "pellet".to_owned(),
            speed: 0.0,
            modes: BTreeMap::new(),
        };
        assert_eq!(
            EntityType::resolve(&spec),
            Err(ConfigError::EmptyModeTable {
                kind: "pellet".to_owned(),
            })
        );
    }

    #[test]
    fn entity_type_resolution_keeps_mode_bundles() {
        let mut modes = BTreeMap::new();
        let _ = modes.insert("default".to_owned(), manual_bundle());
        let spec = EntityTypeSpec {
            name: "player".to_owned(),
            speed: 4.0,
            modes,
        };

        let resolved = EntityType::resolve(&spec).expect("resolves");
        assert_eq!(resolved.name(), "player");
        assert!(resolved.has_mode("default"));
        assert_eq!(
            resolved.mode("default").map(ModeBundle::control),
            Some(&ControlConfig::Manual)
        );
    }
}
