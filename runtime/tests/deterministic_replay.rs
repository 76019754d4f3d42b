use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use machines_td_core::{
    EnemySnapshot, Event, FrameInput, HudSnapshot, InputCommand, TowerKind, WaveSnapshot,
};
use machines_td_runtime::Simulation;
use machines_td_world::query;

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(scripted_frames());
    let second = replay(scripted_frames());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. })),
        "scripted towers should engage the first wave"
    );
}

fn scripted_frames() -> Vec<FrameInput> {
    let press = |commands: &[InputCommand]| FrameInput::from_commands(commands.iter().copied());
    let mut frames = vec![
        press(&[InputCommand::Confirm]),
        press(&[InputCommand::Confirm]),
        press(&[InputCommand::MoveRight]),
        press(&[InputCommand::MoveRight]),
        press(&[InputCommand::MoveDown]),
        press(&[InputCommand::MoveDown]),
        press(&[InputCommand::Build]),
    ];
    frames.extend(std::iter::repeat(FrameInput::idle()).take(900));
    frames.push(press(&[
        InputCommand::MoveRight,
        InputCommand::SelectTower(TowerKind::Drone),
    ]));
    frames.push(press(&[InputCommand::Build]));
    frames.extend(std::iter::repeat(FrameInput::idle()).take(600));
    frames.push(press(&[InputCommand::MoveLeft]));
    frames.push(press(&[InputCommand::Upgrade]));
    frames.extend(std::iter::repeat(FrameInput::idle()).take(1500));
    frames
}

fn replay(frames: Vec<FrameInput>) -> ReplayOutcome {
    let mut simulation = Simulation::default();
    let mut events = Vec::new();
    for frame in &frames {
        events.extend(simulation.step(frame).iter().cloned());
    }

    let world = simulation.world();
    ReplayOutcome {
        hud: query::hud(world),
        wave: query::wave(world),
        enemies: query::enemy_view(world).into_vec(),
        events,
    }
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    hud: HudSnapshot,
    wave: WaveSnapshot,
    enemies: Vec<EnemySnapshot>,
    events: Vec<Event>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hud.hash(&mut hasher);
        self.wave.hash(&mut hasher);
        for enemy in &self.enemies {
            enemy.id.hash(&mut hasher);
            enemy.hp.hash(&mut hasher);
            enemy.position.x.to_bits().hash(&mut hasher);
            enemy.position.y.to_bits().hash(&mut hasher);
        }
        self.events.len().hash(&mut hasher);
        hasher.finish()
    }
}
