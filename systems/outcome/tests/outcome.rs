use std::collections::BTreeMap;
use std::sync::Arc;

use tilerunner_core::{
    config::{
        ControlSpec, EntityType, EntityTypeSpec, ModeBundleSpec, OutcomeCondition, Verdict,
        VisualDescriptor,
    },
    Command, Outcome, TilePoint,
};
use tilerunner_system_outcome::OutcomeEvaluator;
use tilerunner_world::{self as world, query, SeedPlacement, World, WorldSeed};

fn pellet_type() -> Arc<EntityType> {
    let mut modes = BTreeMap::new();
    let _ = modes.insert(
        "default".to_owned(),
        ModeBundleSpec {
            control: ControlSpec {
                strategy: "manual".to_owned(),
                ..ControlSpec::default()
            },
            visual: VisualDescriptor::default(),
            blocks: Vec::new(),
        },
    );
    Arc::new(
        EntityType::resolve(&EntityTypeSpec {
            name: "pellet".to_owned(),
            speed: 0.0,
            modes,
        })
        .expect("type resolves"),
    )
}

fn build_world(pellets: u32) -> World {
    let placements = (0..pellets)
        .map(|index| SeedPlacement {
            kind: "pellet".to_owned(),
            at: TilePoint::new(index as i32, 0),
            mode: "default".to_owned(),
        })
        .collect();
    World::new(WorldSeed {
        grid_width: 5,
        grid_height: 5,
        initial_lives: 3,
        types: vec![pellet_type()],
        placements,
    })
    .expect("world builds")
}

#[test]
fn clearing_all_pellets_wins_the_game() {
    let mut world = build_world(2);
    let mut evaluator = OutcomeEvaluator::new(vec![OutcomeCondition::EntityCountBased {
        kind: "pellet".to_owned(),
        verdict: Verdict::Win,
    }]);

    let mut out = Vec::new();
    evaluator.handle(
        &query::game_state(&world),
        &query::entity_view(&world),
        &mut out,
    );
    assert!(!evaluator.has_game_ended());

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RemoveAllOfKind {
            kind: "pellet".to_owned(),
        },
        &mut events,
    );
    world::apply(&mut world, Command::SweepRemovals, &mut events);

    evaluator.handle(
        &query::game_state(&world),
        &query::entity_view(&world),
        &mut out,
    );
    assert_eq!(evaluator.outcome(), Outcome::Win);

    // Applying the emitted command latches the world's status as well.
    for command in out {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(query::game_state(&world).status, Outcome::Win);
}
