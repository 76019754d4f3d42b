#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that flies projectiles and resolves their impacts.
//!
//! Enemy-bound projectiles chase the live center of their target and are
//! discarded once it dies. Point-bound projectiles fly to a fixed location.
//! A projectile closer than [`PROJECTILE_IMPACT_DISTANCE`] to its aim point
//! detonates; splash projectiles hit every live enemy around the impact point.

use machines_td_core::{
    Command, EnemyId, EnemyView, GameMode, ProjectileSnapshot, ProjectileTarget, ProjectileView,
    WorldPoint, PROJECTILE_IMPACT_DISTANCE,
};

/// Projectile flight and impact system.
#[derive(Debug, Default)]
pub struct Projectiles {
    hits: Vec<EnemyId>,
}

impl Projectiles {
    /// Creates a new projectile system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one movement, detonation or discard command per live projectile.
    pub fn handle(
        &mut self,
        mode: GameMode,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if mode != GameMode::Playing {
            return;
        }

        for projectile in projectiles.iter() {
            let Some(aim) = aim_point(projectile, enemies) else {
                out.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                });
                continue;
            };

            if projectile.position.distance(aim) < PROJECTILE_IMPACT_DISTANCE {
                self.collect_hits(projectile, aim, enemies);
                out.push(Command::DetonateProjectile {
                    projectile: projectile.id,
                    hits: self.hits.clone(),
                });
            } else {
                out.push(Command::MoveProjectile {
                    projectile: projectile.id,
                    position: projectile.position.step_toward(aim, projectile.speed),
                });
            }
        }
    }

    fn collect_hits(
        &mut self,
        projectile: &ProjectileSnapshot,
        aim: WorldPoint,
        enemies: &EnemyView,
    ) {
        self.hits.clear();
        match (projectile.splash_radius, projectile.target) {
            (Some(radius), _) => {
                let reach = radius * radius;
                self.hits.extend(
                    enemies
                        .iter_alive()
                        .filter(|enemy| enemy.center().distance_squared(aim) <= reach)
                        .map(|enemy| enemy.id),
                );
            }
            (None, ProjectileTarget::Enemy(id)) => self.hits.push(id),
            (None, ProjectileTarget::Point(_)) => {}
        }
    }
}

fn aim_point(projectile: &ProjectileSnapshot, enemies: &EnemyView) -> Option<WorldPoint> {
    match projectile.target {
        ProjectileTarget::Enemy(id) => enemies.get_alive(id).map(|enemy| enemy.center()),
        ProjectileTarget::Point(point) => Some(point),
    }
}
