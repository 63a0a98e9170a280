use std::collections::BTreeMap;
use std::sync::Arc;

use tilerunner_core::{
    config::{
        CollisionEventSpec, CollisionRule, ControlSpec, EntityType, EntityTypeSpec,
        ModeBundleSpec, VisualDescriptor,
    },
    Command, TilePoint,
};
use tilerunner_system_collision::Collisions;
use tilerunner_world::{self as world, query, SeedPlacement, World, WorldSeed};

fn entity_type(name: &str) -> Arc<EntityType> {
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
            name: name.to_owned(),
            speed: 1.0,
            modes,
        })
        .expect("type resolves"),
    )
}

fn placement(kind: &str, x: i32, y: i32) -> SeedPlacement {
    SeedPlacement {
        kind: kind.to_owned(),
        at: TilePoint::new(x, y),
        mode: "default".to_owned(),
    }
}

fn build_world(kinds: &[&str], placements: Vec<SeedPlacement>) -> World {
    World::new(WorldSeed {
        grid_width: 5,
        grid_height: 5,
        initial_lives: 3,
        types: kinds.iter().map(|kind| entity_type(kind)).collect(),
        placements,
    })
    .expect("world builds")
}

fn effect(kind: &str) -> CollisionEventSpec {
    CollisionEventSpec {
        kind: kind.to_owned(),
        ..CollisionEventSpec::default()
    }
}

fn score_effect(amount: i64) -> CollisionEventSpec {
    CollisionEventSpec {
        kind: "update_score".to_owned(),
        amount: Some(amount),
        ..CollisionEventSpec::default()
    }
}

// The player eats the pellet: score on the player side, and the player's
// consume removes the opposite entity.
fn pellet_rule() -> CollisionRule {
    CollisionRule {
        kind_a: "player".to_owned(),
        kind_b: "pellet".to_owned(),
        effects_a: vec![score_effect(10), effect("consume")],
        ..CollisionRule::default()
    }
}

fn resolve_and_apply(world: &mut World, collisions: &Collisions) -> Vec<Command> {
    let mut commands = Vec::new();
    collisions.handle(&query::entity_view(world), &mut commands);
    let mut events = Vec::new();
    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    world::apply(world, Command::SweepRemovals, &mut events);
    commands
}

#[test]
fn pellet_collision_scores_and_removes_the_pellet() {
    let mut world = build_world(
        &["player", "pellet"],
        vec![placement("player", 2, 2), placement("pellet", 2, 2)],
    );
    let collisions = Collisions::new(&[pellet_rule()]);

    let _ = resolve_and_apply(&mut world, &collisions);

    let view = query::entity_view(&world);
    assert_eq!(view.count_of_kind("pellet"), 0);
    assert_eq!(view.count_of_kind("player"), 1);
    assert_eq!(query::game_state(&world).score, 10);
}

#[test]
fn resolution_is_symmetric_in_placement_order() {
    let collisions = Collisions::new(&[pellet_rule()]);

    let mut forward = build_world(
        &["player", "pellet"],
        vec![placement("player", 2, 2), placement("pellet", 2, 2)],
    );
    let mut reversed = build_world(
        &["player", "pellet"],
        vec![placement("pellet", 2, 2), placement("player", 2, 2)],
    );

    let _ = resolve_and_apply(&mut forward, &collisions);
    let _ = resolve_and_apply(&mut reversed, &collisions);

    for world in [&forward, &reversed] {
        let view = query::entity_view(world);
        assert_eq!(view.count_of_kind("pellet"), 0);
        assert_eq!(view.count_of_kind("player"), 1);
        assert_eq!(query::game_state(world).score, 10);
    }
}

#[test]
fn unmatched_pair_is_a_no_op() {
    let mut world = build_world(
        &["player", "ghost"],
        vec![placement("player", 2, 2), placement("ghost", 2, 2)],
    );
    let collisions = Collisions::new(&[pellet_rule()]);

    let commands = resolve_and_apply(&mut world, &collisions);

    assert!(commands.is_empty());
    assert_eq!(query::entity_view(&world).iter().count(), 2);
}

#[test]
fn update_lives_applies_exactly_once_per_pair() {
    let rule = CollisionRule {
        kind_a: "player".to_owned(),
        kind_b: "ghost".to_owned(),
        effects_a: vec![
            CollisionEventSpec {
                kind: "update_lives".to_owned(),
                amount: Some(-1),
                ..CollisionEventSpec::default()
            },
            effect("return_to_spawn_location"),
        ],
        ..CollisionRule::default()
    };
    let mut world = build_world(
        &["player", "ghost"],
        vec![placement("player", 2, 2), placement("ghost", 2, 2)],
    );
    let collisions = Collisions::new(&[rule]);

    let _ = resolve_and_apply(&mut world, &collisions);

    let state = query::game_state(&world);
    assert_eq!(state.lives, 2);
    // Both entities survive; the player is back on its spawn tile.
    let view = query::entity_view(&world);
    assert_eq!(view.iter().count(), 2);
    assert_eq!(
        view.first_of_kind("player").unwrap().tile(),
        TilePoint::new(2, 2)
    );
}

#[test]
fn remove_all_of_type_spares_other_kinds_in_order() {
    let rule = CollisionRule {
        kind_a: "player".to_owned(),
        kind_b: "power_pellet".to_owned(),
        effects_a: vec![
            CollisionEventSpec {
                kind: "remove_all_entities_of_type".to_owned(),
                target: Some("pellet".to_owned()),
                ..CollisionEventSpec::default()
            },
            effect("consume"),
        ],
        ..CollisionRule::default()
    };
    let mut world = build_world(
        &["player", "pellet", "power_pellet", "ghost"],
        vec![
            placement("pellet", 0, 0),
            placement("ghost", 1, 0),
            placement("pellet", 2, 0),
            placement("player", 3, 3),
            placement("power_pellet", 3, 3),
        ],
    );
    let collisions = Collisions::new(&[rule]);

    let _ = resolve_and_apply(&mut world, &collisions);

    let view = query::entity_view(&world);
    assert_eq!(view.count_of_kind("pellet"), 0);
    assert_eq!(view.count_of_kind("power_pellet"), 0);
    let survivors: Vec<&str> = view
        .iter()
        .map(|snapshot| snapshot.kind.name())
        .collect();
    assert_eq!(survivors, vec!["ghost", "player"]);
}

#[test]
fn mode_gated_rule_ignores_entities_in_other_modes() {
    let rule = CollisionRule {
        kind_a: "player".to_owned(),
        kind_b: "ghost".to_owned(),
        modes_b: vec!["frightened".to_owned()],
        effects_a: vec![score_effect(200)],
        effects_b: vec![effect("return_to_spawn_location")],
        ..CollisionRule::default()
    };
    let mut world = build_world(
        &["player", "ghost"],
        vec![placement("player", 2, 2), placement("ghost", 2, 2)],
    );
    let collisions = Collisions::new(&[rule]);

    // The ghost is in its default mode, so the frightened-only rule is inert.
    let commands = resolve_and_apply(&mut world, &collisions);

    assert!(commands.is_empty());
    assert_eq!(query::game_state(&world).score, 0);
}

#[test]
fn unknown_effect_falls_back_to_consuming_the_opposite_side() {
    let rule = CollisionRule {
        kind_a: "player".to_owned(),
        kind_b: "pellet".to_owned(),
        effects_a: vec![effect("vaporize")],
        ..CollisionRule::default()
    };
    let mut world = build_world(
        &["player", "pellet"],
        vec![placement("player", 2, 2), placement("pellet", 2, 2)],
    );
    let collisions = Collisions::new(&[rule]);

    let _ = resolve_and_apply(&mut world, &collisions);

    // The fallback consume is owned by the player side, so the pellet goes.
    let view = query::entity_view(&world);
    assert_eq!(view.count_of_kind("player"), 1);
    assert_eq!(view.count_of_kind("pellet"), 0);
}
