#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that steers tower drones and requests their melee strikes.
//!
//! Every tick each drone re-acquires the nearest live enemy. Without a target
//! it drifts back to its home point; otherwise it chases the target and strikes
//! once its melee cooldown has elapsed and the target was within reach before
//! the move.

use machines_td_core::{
    Command, DroneSnapshot, EnemySnapshot, EnemyView, GameMode, TowerId, TowerView, WorldPoint,
    DRONE_STRIKE_RADIUS,
};

/// Drone steering system.
#[derive(Debug, Default)]
pub struct Drones;

impl Drones {
    /// Creates a new drone system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits steering and strike commands for every drone on the map.
    pub fn handle(
        &mut self,
        mode: GameMode,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if mode != GameMode::Playing {
            return;
        }

        for tower in towers.iter() {
            if let Some(drone) = tower.drone {
                steer(tower.id, &drone, enemies, out);
            }
        }
    }
}

fn steer(tower: TowerId, drone: &DroneSnapshot, enemies: &EnemyView, out: &mut Vec<Command>) {
    let Some(target) = nearest(drone.position, enemies) else {
        let position = drone.position.step_toward(drone.home, drone.speed);
        if position != drone.position || drone.target.is_some() {
            out.push(Command::SteerDrone {
                tower,
                position,
                target: None,
            });
        }
        return;
    };

    let aim = target.center();
    let distance = drone.position.distance(aim);
    out.push(Command::SteerDrone {
        tower,
        position: drone.position.step_toward(aim, drone.speed),
        target: Some(target.id),
    });

    let ready = drone.cooldown.saturating_sub(1) == 0;
    if ready && distance < DRONE_STRIKE_RADIUS {
        out.push(Command::DroneStrike {
            tower,
            target: target.id,
        });
    }
}

/// Nearest live enemy by center distance; the earlier enemy wins ties.
fn nearest(from: WorldPoint, enemies: &EnemyView) -> Option<&EnemySnapshot> {
    let mut best: Option<(&EnemySnapshot, f32)> = None;
    for enemy in enemies.iter_alive() {
        let distance = from.distance_squared(enemy.center());
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((enemy, distance)),
        }
    }
    best.map(|(enemy, _)| enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use machines_td_core::{
        EnemyId, EnemyKind, GridPos, MapId, TowerKind, TowerSnapshot, TowerStats, DRONE_SPEED,
    };

    fn drone_tower(position: WorldPoint, cooldown: u32, target: Option<EnemyId>) -> TowerView {
        let cell = GridPos::new(0, 0);
        TowerView::from_snapshots(vec![TowerSnapshot {
            id: TowerId::new(4),
            kind: TowerKind::Drone,
            map: MapId::Map1,
            cell,
            level: 1,
            stats: TowerStats::for_kind(TowerKind::Drone),
            cooldown: 0,
            invested: 50,
            drone: Some(DroneSnapshot {
                position,
                home: cell.center(),
                speed: DRONE_SPEED,
                cooldown,
                target,
            }),
        }])
    }

    fn enemy(slot: u32, center: (f32, f32)) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(slot, 0),
            kind: EnemyKind::Basic,
            position: WorldPoint::new(center.0 - 4.0, center.1 - 4.0),
            path_index: 0,
            hp: 4,
            reward: 5,
            alive: true,
        }
    }

    #[test]
    fn equidistant_enemies_resolve_to_the_earlier_one() {
        let towers = drone_tower(WorldPoint::new(4.0, 4.0), 5, None);
        let enemies = EnemyView::from_snapshots(vec![enemy(9, (14.0, 4.0)), enemy(2, (-6.0, 4.0))]);
        let mut out = Vec::new();

        Drones::new().handle(GameMode::Playing, &towers, &enemies, &mut out);

        assert!(matches!(
            out.first(),
            Some(Command::SteerDrone {
                target: Some(id),
                ..
            }) if *id == EnemyId::new(9, 0)
        ));
    }

    #[test]
    fn ready_drone_strikes_target_within_reach() {
        let towers = drone_tower(WorldPoint::new(4.0, 4.0), 1, None);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, (5.0, 4.0))]);
        let mut out = Vec::new();

        Drones::new().handle(GameMode::Playing, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![
                Command::SteerDrone {
                    tower: TowerId::new(4),
                    position: WorldPoint::new(5.0, 4.0),
                    target: Some(EnemyId::new(1, 0)),
                },
                Command::DroneStrike {
                    tower: TowerId::new(4),
                    target: EnemyId::new(1, 0),
                },
            ]
        );
    }

    #[test]
    fn cooling_down_or_distant_drones_only_move() {
        let cooling = drone_tower(WorldPoint::new(4.0, 4.0), 6, None);
        let near = EnemyView::from_snapshots(vec![enemy(1, (14.0, 4.0))]);
        let mut out = Vec::new();
        Drones::new().handle(GameMode::Playing, &cooling, &near, &mut out);
        assert_eq!(out.len(), 1);

        out.clear();
        let ready = drone_tower(WorldPoint::new(4.0, 4.0), 0, None);
        let far = EnemyView::from_snapshots(vec![enemy(1, (104.0, 4.0))]);
        Drones::new().handle(GameMode::Playing, &ready, &far, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn idle_drone_returns_home_and_stops() {
        let towers = drone_tower(WorldPoint::new(5.0, 4.0), 0, Some(EnemyId::new(3, 0)));
        let mut out = Vec::new();

        Drones::new().handle(GameMode::Playing, &towers, &EnemyView::default(), &mut out);
        assert_eq!(
            out,
            vec![Command::SteerDrone {
                tower: TowerId::new(4),
                position: WorldPoint::new(4.0, 4.0),
                target: None,
            }]
        );

        out.clear();
        let home = drone_tower(WorldPoint::new(4.0, 4.0), 0, None);
        Drones::new().handle(GameMode::Playing, &home, &EnemyView::default(), &mut out);
        assert!(out.is_empty());
    }
}
