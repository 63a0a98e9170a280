#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Conditional mode transitions.
//!
//! Each configured transition names an entity type, the mode it must be in,
//! the mode it switches to, and a triggering condition. Time conditions use
//! a one-second window rather than a persistent threshold, so a transition
//! fires during exactly one qualifying second of game time instead of on
//! every tick after it. Spawn and outcome conditions deliberately do not
//! share this windowing.

use tracing::warn;

use tilerunner_core::{
    config::{Condition, ConditionKind, ModeChangeEvent},
    Command,
};
use tilerunner_world::query::{EntityView, GameStateSnapshot};

/// Pure system that emits mode switches for entities whose transition
/// condition holds this tick.
#[derive(Clone, Debug, Default)]
pub struct ModeTransitions {
    events: Vec<ModeChangeEvent>,
}

impl ModeTransitions {
    /// Creates the evaluator over the configured transition list.
    #[must_use]
    pub fn new(events: Vec<ModeChangeEvent>) -> Self {
        Self { events }
    }

    /// Emits a mode switch for every entity matching a firing transition.
    pub fn handle(&self, state: &GameStateSnapshot, view: &EntityView, out: &mut Vec<Command>) {
        for event in &self.events {
            if !should_change(&event.condition, state) {
                continue;
            }
            for entity in view.iter() {
                if entity.kind.name() == event.kind && entity.mode == event.from_mode {
                    out.push(Command::SetMode {
                        id: entity.id,
                        mode: event.to_mode.clone(),
                    });
                }
            }
        }
    }
}

/// Evaluates a transition condition against the current game state.
///
/// Time conditions hold only while elapsed time lies in `[amount, amount+1)`.
/// Score conditions hold from the threshold onward. Malformed conditions
/// evaluate to false with a logged warning, never an error.
#[must_use]
pub fn should_change(condition: &Condition, state: &GameStateSnapshot) -> bool {
    match condition.resolved_kind() {
        ConditionKind::TimeElapsed => match condition.amount() {
            Some(amount) => {
                state.elapsed_seconds >= amount && state.elapsed_seconds < amount + 1.0
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use tilerunner_core::Outcome;

    fn state_at(elapsed_seconds: f64, score: i64) -> GameStateSnapshot {
        GameStateSnapshot {
            score,
            lives: 3,
            elapsed_seconds,
            high_score: 0,
            status: Outcome::Ongoing,
        }
    }

    #[test]
    fn time_condition_holds_only_inside_its_window() {
        let condition = Condition::time_elapsed(5.0);
        assert!(!should_change(&condition, &state_at(4.9, 0)));
        assert!(should_change(&condition, &state_at(5.0, 0)));
        assert!(should_change(&condition, &state_at(5.9, 0)));
        assert!(!should_change(&condition, &state_at(6.0, 0)));
    }

    #[test]
    fn score_condition_holds_from_threshold_onward() {
        let condition = Condition::score_based(100.0);
        assert!(!should_change(&condition, &state_at(0.0, 99)));
        assert!(should_change(&condition, &state_at(0.0, 100)));
        assert!(should_change(&condition, &state_at(0.0, 5000)));
    }

    #[test]
    fn never_and_unknown_conditions_are_false() {
        assert!(!should_change(&Condition::never(), &state_at(10.0, 10)));
        let unknown = Condition {
            kind: "lunar_phase".to_owned(),
            params: Default::default(),
        };
        assert!(!should_change(&unknown, &state_at(10.0, 10)));
    }

    #[test]
    fn missing_amount_is_false_not_an_error() {
        let condition = Condition {
            kind: "time_elapsed".to_owned(),
            params: Default::default(),
        };
        assert!(!should_change(&condition, &state_at(10.0, 0)));
    }
}
