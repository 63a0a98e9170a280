#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter running a built-in demo board.
//!
//! The demo board pits a target-seeking chaser against a scripted player on
//! a small open grid of pellets. The adapter stands in for the rendering and
//! input collaborators: it feeds a constant directional input each tick and
//! prints the final state when the session ends or the tick budget runs out.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use tilerunner_core::{
    config::{
        CollisionEventSpec, CollisionRule, ControlSpec, EntityTypeSpec, GameConfig,
        InitialPlacement, ModeBundleSpec, OutcomeCondition, TargetSpec, Verdict,
        VisualDescriptor,
    },
    Direction, InputSnapshot, Outcome, TilePoint,
};
use tilerunner_engine::Session;
use tilerunner_world::query;

#[derive(Debug, Parser)]
#[command(name = "tilerunner", about = "Run the built-in tilerunner demo board")]
struct Args {
    /// Maximum number of simulation ticks before giving up.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut session = Session::new(demo_config())?;
    let dt = Duration::from_millis(args.tick_ms);

    let mut input = InputSnapshot::new();
    input.press(Direction::Right);

    for _ in 0..args.ticks {
        session.tick(dt, &input);
        if session.outcome() != Outcome::Ongoing {
            break;
        }
    }

    let state = query::game_state(session.world());
    info!(
        outcome = ?session.outcome(),
        score = state.score,
        elapsed = state.elapsed_seconds,
        "demo finished"
    );
    println!(
        "outcome: {:?}  score: {}  lives: {}  elapsed: {:.1}s",
        session.outcome(),
        state.score,
        state.lives,
        state.elapsed_seconds,
    );
    Ok(())
}

fn bundle(control: ControlSpec) -> ModeBundleSpec {
    ModeBundleSpec {
        control,
        visual: VisualDescriptor::default(),
        blocks: Vec::new(),
    }
}

fn single_mode(name: &str, speed: f32, control: ControlSpec) -> EntityTypeSpec {
    let mut modes = BTreeMap::new();
    let _ = modes.insert("default".to_owned(), bundle(control));
    EntityTypeSpec {
        name: name.to_owned(),
        speed,
        modes,
    }
}

fn placement(kind: &str, x: i32, y: i32) -> InitialPlacement {
    InitialPlacement {
        kind: kind.to_owned(),
        at: TilePoint::new(x, y),
        mode: "default".to_owned(),
    }
}

fn demo_config() -> GameConfig {
    let player = single_mode(
        "player",
        2.0,
        ControlSpec {
            strategy: "manual".to_owned(),
            ..ControlSpec::default()
        },
    );
    let chaser = single_mode(
        "chaser",
        1.0,
        ControlSpec {
            strategy: "target_seeking".to_owned(),
            target: Some(TargetSpec {
                strategy: "track_entity".to_owned(),
                kind: Some("player".to_owned()),
                ..TargetSpec::default()
            }),
            ..ControlSpec::default()
        },
    );
    let pellet = single_mode(
        "pellet",
        0.0,
        ControlSpec {
            strategy: "manual".to_owned(),
            ..ControlSpec::default()
        },
    );

    GameConfig {
        grid_width: 9,
        grid_height: 5,
        initial_lives: 3,
        entity_types: vec![player, chaser, pellet],
        placements: vec![
            placement("player", 0, 2),
            placement("chaser", 8, 4),
            placement("pellet", 2, 2),
            placement("pellet", 4, 2),
            placement("pellet", 6, 2),
            placement("pellet", 8, 2),
        ],
        collision_rules: vec![
            CollisionRule {
                kind_a: "player".to_owned(),
                kind_b: "pellet".to_owned(),
                effects_a: vec![
                    CollisionEventSpec {
                        kind: "update_score".to_owned(),
                        amount: Some(10),
                        ..CollisionEventSpec::default()
                    },
                    CollisionEventSpec {
                        kind: "consume".to_owned(),
                        ..CollisionEventSpec::default()
                    },
                ],
                ..CollisionRule::default()
            },
            CollisionRule {
                kind_a: "chaser".to_owned(),
                kind_b: "player".to_owned(),
                effects_a: vec![CollisionEventSpec {
                    kind: "update_lives".to_owned(),
                    amount: Some(-1),
                    ..CollisionEventSpec::default()
                }],
                effects_b: vec![CollisionEventSpec {
                    kind: "return_to_spawn_location".to_owned(),
                    ..CollisionEventSpec::default()
                }],
                ..CollisionRule::default()
            },
        ],
        spawn_events: Vec::new(),
        mode_changes: Vec::new(),
        outcomes: vec![
            OutcomeCondition::LivesBased { minimum: 0 },
            OutcomeCondition::EntityCountBased {
                kind: "pellet".to_owned(),
                verdict: Verdict::Win,
            },
        ],
    }
}
