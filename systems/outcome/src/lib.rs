#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal game outcome evaluation.
//!
//! The evaluator runs last in the tick order, after every mutation has
//! settled, and checks the configured win/lose conditions against game
//! state. Thresholds are crossed-and-stay: once any condition has ended the
//! game, the evaluator keeps reporting that outcome for the rest of the
//! session regardless of later state changes. When several conditions cross
//! on the same tick, the first in configuration order decides.

use tilerunner_core::{config::OutcomeCondition, Command, Outcome};
use tilerunner_world::query::{EntityView, GameStateSnapshot};

/// Pure system that latches the terminal outcome of a session.
#[derive(Clone, Debug, Default)]
pub struct OutcomeEvaluator {
    conditions: Vec<OutcomeCondition>,
    ended: Option<Outcome>,
}

impl OutcomeEvaluator {
    /// Creates the evaluator over the configured condition list.
    #[must_use]
    pub fn new(conditions: Vec<OutcomeCondition>) -> Self {
        Self {
            conditions,
            ended: None,
        }
    }

    /// Whether a condition has ended the game on this or any earlier tick.
    #[must_use]
    pub fn has_game_ended(&self) -> bool {
        self.ended.is_some()
    }

    /// The latched outcome, [`Outcome::Ongoing`] while the game runs.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.ended.unwrap_or(Outcome::Ongoing)
    }

    /// Checks the conditions and emits the end-of-game command when the
    /// first one crosses.
    pub fn handle(
        &mut self,
        state: &GameStateSnapshot,
        view: &EntityView,
        out: &mut Vec<Command>,
    ) {
        if self.ended.is_some() {
            return;
        }
        for condition in &self.conditions {
            if let Some(outcome) = evaluate(condition, state, view) {
                self.ended = Some(outcome);
                out.push(Command::EndGame { outcome });
                return;
            }
        }
    }
}

fn evaluate(
    condition: &OutcomeCondition,
    state: &GameStateSnapshot,
    view: &EntityView,
) -> Option<Outcome> {
    match condition {
        OutcomeCondition::LivesBased { minimum } => {
            (state.lives <= *minimum).then_some(Outcome::Loss)
        }
        OutcomeCondition::TimeBased {
            limit_seconds,
            verdict,
        } => (state.elapsed_seconds >= *limit_seconds).then_some(verdict.outcome()),
        OutcomeCondition::ScoreBased { target } => {
            (state.score >= *target).then_some(Outcome::Win)
        }
        OutcomeCondition::EntityCountBased { kind, verdict } => {
            (view.count_of_kind(kind) == 0).then_some(verdict.outcome())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilerunner_world::query::EntityView;

    fn state_at(elapsed_seconds: f64, score: i64, lives: i64) -> GameStateSnapshot {
        GameStateSnapshot {
            score,
            lives,
            elapsed_seconds,
            high_score: 0,
            status: Outcome::Ongoing,
        }
    }

    fn empty_view() -> EntityView {
        EntityView::from_snapshots(Vec::new())
    }

    #[test]
    fn lives_condition_loses_at_or_below_the_minimum() {
        let mut evaluator = OutcomeEvaluator::new(vec![OutcomeCondition::LivesBased {
            minimum: 0,
        }]);
        let mut out = Vec::new();

        evaluator.handle(&state_at(0.0, 0, 1), &empty_view(), &mut out);
        assert!(!evaluator.has_game_ended());

        evaluator.handle(&state_at(0.0, 0, 0), &empty_view(), &mut out);
        assert!(evaluator.has_game_ended());
        assert_eq!(evaluator.outcome(), Outcome::Loss);
        assert_eq!(out, vec![Command::EndGame { outcome: Outcome::Loss }]);
    }

    #[test]
    fn negative_lives_still_trigger_the_loss() {
        let mut evaluator = OutcomeEvaluator::new(vec![OutcomeCondition::LivesBased {
            minimum: 0,
        }]);
        let mut out = Vec::new();
        evaluator.handle(&state_at(0.0, 0, -2), &empty_view(), &mut out);
        assert_eq!(evaluator.outcome(), Outcome::Loss);
    }

    #[test]
    fn outcome_stays_latched_after_state_recovers() {
        let mut evaluator = OutcomeEvaluator::new(vec![OutcomeCondition::ScoreBased {
            target: 100,
        }]);
        let mut out = Vec::new();

        evaluator.handle(&state_at(0.0, 100, 3), &empty_view(), &mut out);
        assert_eq!(evaluator.outcome(), Outcome::Win);

        // A later tick with the threshold no longer met changes nothing and
        // emits nothing further.
        out.clear();
        evaluator.handle(&state_at(0.0, 0, 3), &empty_view(), &mut out);
        assert_eq!(evaluator.outcome(), Outcome::Win);
        assert!(out.is_empty());
    }

    #[test]
    fn time_limit_produces_its_configured_verdict() {
        let mut evaluator = OutcomeEvaluator::new(vec![OutcomeCondition::TimeBased {
            limit_seconds: 60.0,
            verdict: tilerunner_core::config::Verdict::Win,
        }]);
        let mut out = Vec::new();

        evaluator.handle(&state_at(59.9, 0, 3), &empty_view(), &mut out);
        assert!(!evaluator.has_game_ended());
        evaluator.handle(&state_at(60.0, 0, 3), &empty_view(), &mut out);
        assert_eq!(evaluator.outcome(), Outcome::Win);
    }

    #[test]
    fn first_crossing_condition_in_order_decides() {
        let mut evaluator = OutcomeEvaluator::new(vec![
            OutcomeCondition::LivesBased { minimum: 0 },
            OutcomeCondition::ScoreBased { target: 100 },
        ]);
        let mut out = Vec::new();

        // Both cross on the same tick; the lives condition is listed first.
        evaluator.handle(&state_at(0.0, 100, 0), &empty_view(), &mut out);
        assert_eq!(evaluator.outcome(), Outcome::Loss);
    }
}
