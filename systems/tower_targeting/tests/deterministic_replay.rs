use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use machines_td_core::{
    Command, EnemyId, EnemyKind, EnemySpawn, GameMode, GridPos, MapId, TowerId, TowerKind,
    TowerTarget,
};
use machines_td_system_pathfinding::find_routes;
use machines_td_system_tower_targeting::TowerTargeting;
use machines_td_world::{self as world, query, World};

#[test]
fn deterministic_replay_locks_onto_the_first_spawned_enemy() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    let spawned = first
        .assignments
        .iter()
        .find(|targets| !targets.is_empty())
        .expect("tower acquires a target once enemies spawn");
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].tower, TowerId::new(0));

    let locked = spawned[0].enemy;
    assert!(
        first
            .assignments
            .iter()
            .filter(|targets| !targets.is_empty())
            .take(5)
            .all(|targets| targets[0].enemy == locked),
        "first match keeps the earliest spawned enemy while it stays in range"
    );

    let paused = first.assignments.last().expect("assignments recorded");
    assert!(paused.is_empty(), "paused sessions must clear targets");
}

fn scripted_commands() -> Vec<Command> {
    let world = World::new();
    let routes = find_routes(&world, MapId::Map1);
    let spawn = routes.spawns[0];
    let enemy = |hp| EnemySpawn {
        kind: EnemyKind::Basic,
        route: 0,
        origin: spawn,
        hp,
        reward: 5,
        speed_tiles: 1.0,
    };

    let mut commands = vec![
        Command::EnterPlaying {
            map: MapId::Map1,
            routes,
        },
        Command::StartWave {
            wave: 1,
            boss_pending: false,
        },
        Command::PlaceTower {
            kind: TowerKind::Normal,
            cell: GridPos::new(2, 2),
        },
        Command::SpawnRound {
            spawns: vec![enemy(4), enemy(6)],
        },
    ];
    for _ in 0..30 {
        commands.push(Command::Tick);
        commands.push(Command::AdvanceEnemies);
    }
    commands.push(Command::SetGameMode {
        mode: GameMode::Paused,
    });
    commands
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut targeting = TowerTargeting::new();
    let mut current = Vec::new();
    let mut assignments = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        targeting.handle(
            query::game_mode(&world),
            &query::tower_view(&world),
            &query::enemy_view(&world),
            &mut current,
        );
        assignments.push(current.clone());
    }

    ReplayOutcome { assignments }
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    assignments: Vec<Vec<TowerTarget>>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for targets in &self.assignments {
            targets.len().hash(&mut hasher);
            for target in targets {
                hash_target(target.tower, target.enemy, &mut hasher);
                target.enemy_center.x.to_bits().hash(&mut hasher);
                target.enemy_center.y.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

fn hash_target(tower: TowerId, enemy: EnemyId, hasher: &mut DefaultHasher) {
    tower.hash(hasher);
    enemy.hash(hasher);
}
