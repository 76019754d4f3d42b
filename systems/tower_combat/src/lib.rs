#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile volleys from targeting data.
//!
//! Normal towers fire a single projectile bound to their target. AOE towers
//! fan out splash projectiles aimed at fixed offsets around the target's
//! center.

use machines_td_core::{
    Command, GameMode, ProjectileTarget, TowerKind, TowerSnapshot, TowerTarget, TowerView,
    AOE_SPREAD_OFFSETS,
};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectiles` entries for towers ready to fire.
    pub fn handle(
        &mut self,
        mode: GameMode,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if mode != GameMode::Playing || tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            let Some(snapshot) = find_tower(towers, target) else {
                continue;
            };
            if snapshot.cooldown > 0 {
                continue;
            }
            let targets = volley(snapshot, target);
            if targets.is_empty() {
                continue;
            }
            self.scratch.push(Command::FireProjectiles {
                tower: target.tower,
                targets,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_tower<'a>(towers: &'a TowerView, target: &TowerTarget) -> Option<&'a TowerSnapshot> {
    towers.iter().find(|snapshot| snapshot.id == target.tower)
}

fn volley(tower: &TowerSnapshot, target: &TowerTarget) -> Vec<ProjectileTarget> {
    match tower.kind {
        TowerKind::Normal => vec![ProjectileTarget::Enemy(target.enemy)],
        TowerKind::Aoe => AOE_SPREAD_OFFSETS
            .iter()
            .take(tower.stats.projectile_count as usize)
            .map(|&(dx, dy)| ProjectileTarget::Point(target.enemy_center.offset(dx, dy)))
            .collect(),
        TowerKind::Drone => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machines_td_core::{EnemyId, GridPos, MapId, TowerId, TowerStats, WorldPoint};

    fn snapshot(tower: u32, kind: TowerKind, cooldown: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(tower),
            kind,
            map: MapId::Map1,
            cell: GridPos::new(0, 0),
            level: 1,
            stats: TowerStats::for_kind(kind),
            cooldown,
            invested: kind.purchase_cost(),
            drone: None,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy, 0),
            tower_center: WorldPoint::new(4.0, 4.0),
            enemy_center: WorldPoint::new(20.0, 12.0),
        }
    }

    #[test]
    fn non_playing_mode_is_silent() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(1, TowerKind::Normal, 0)]);
        let targets = vec![target(1, 7)];
        let mut out = Vec::new();

        system.handle(GameMode::Paused, &towers, &targets, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn firing_respects_cooldown_readiness() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(2, TowerKind::Normal, 0),
            snapshot(3, TowerKind::Normal, 12),
            snapshot(5, TowerKind::Normal, 0),
        ]);
        let targets = vec![target(2, 4), target(3, 9), target(5, 1), target(42, 3)];
        let mut out = Vec::new();

        system.handle(GameMode::Playing, &towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireProjectiles {
                    tower: TowerId::new(2),
                    targets: vec![ProjectileTarget::Enemy(EnemyId::new(4, 0))],
                },
                Command::FireProjectiles {
                    tower: TowerId::new(5),
                    targets: vec![ProjectileTarget::Enemy(EnemyId::new(1, 0))],
                },
            ],
        );
    }

    #[test]
    fn aoe_towers_fan_out_around_the_target_center() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(1, TowerKind::Aoe, 0)]);
        let mut out = Vec::new();

        system.handle(GameMode::Playing, &towers, &[target(1, 2)], &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectiles {
                tower: TowerId::new(1),
                targets: vec![
                    ProjectileTarget::Point(WorldPoint::new(12.0, 8.0)),
                    ProjectileTarget::Point(WorldPoint::new(16.0, 10.0)),
                    ProjectileTarget::Point(WorldPoint::new(20.0, 12.0)),
                ],
            }],
        );
    }

    #[test]
    fn upgraded_aoe_towers_fire_more_projectiles() {
        let mut system = TowerCombat::new();
        let mut tower = snapshot(1, TowerKind::Aoe, 0);
        tower.stats = tower
            .stats
            .upgraded(TowerKind::Aoe)
            .upgraded(TowerKind::Aoe);
        let towers = TowerView::from_snapshots(vec![tower]);
        let mut out = Vec::new();

        system.handle(GameMode::Playing, &towers, &[target(1, 2)], &mut out);

        let Some(Command::FireProjectiles { targets, .. }) = out.first() else {
            panic!("expected a volley, got {out:?}");
        };
        assert_eq!(targets.len(), 5);
    }
}
