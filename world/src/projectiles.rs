//! Projectiles in flight.

use machines_td_core::{ProjectileId, ProjectileTarget, WorldPoint, PROJECTILE_SPEED};

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    pub(crate) position: WorldPoint,
    pub(crate) target: ProjectileTarget,
    pub(crate) damage: u32,
    pub(crate) speed: f32,
    pub(crate) splash_radius: Option<f32>,
    pub(crate) alive: bool,
}

/// Projectiles kept in firing order.
#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: Vec<ProjectileState>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn fire(
        &mut self,
        origin: WorldPoint,
        target: ProjectileTarget,
        damage: u32,
        splash_radius: Option<f32>,
    ) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        self.entries.push(ProjectileState {
            id,
            position: origin,
            target,
            damage,
            speed: PROJECTILE_SPEED,
            splash_radius,
            alive: true,
        });
        id
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut ProjectileState> {
        self.entries
            .iter_mut()
            .find(|projectile| projectile.id == id && projectile.alive)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProjectileState> {
        self.entries.iter()
    }

    /// Keeps only projectiles that are still in flight.
    pub(crate) fn prune(&mut self) {
        self.entries.retain(|projectile| projectile.alive);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machines_td_core::EnemyId;

    #[test]
    fn spent_projectiles_are_hidden_and_pruned() {
        let mut registry = ProjectileRegistry::new();
        let id = registry.fire(
            WorldPoint::new(4.0, 4.0),
            ProjectileTarget::Enemy(EnemyId::new(0, 0)),
            1,
            None,
        );
        if let Some(projectile) = registry.get_mut(id) {
            projectile.alive = false;
        }
        assert!(registry.get_mut(id).is_none());
        registry.prune();
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn identifiers_increase_monotonically() {
        let mut registry = ProjectileRegistry::new();
        let target = ProjectileTarget::Point(WorldPoint::default());
        let first = registry.fire(WorldPoint::default(), target, 1, Some(12.0));
        let second = registry.fire(WorldPoint::default(), target, 1, Some(12.0));
        assert!(second > first);
    }
}
