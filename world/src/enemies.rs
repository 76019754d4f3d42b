//! Generational arena storing the enemies on the map.

use machines_td_core::{EnemyId, EnemyKind, WorldPoint};

/// Mutable enemy state owned by the registry.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) kind: EnemyKind,
    pub(crate) route: usize,
    pub(crate) path_index: usize,
    pub(crate) position: WorldPoint,
    pub(crate) speed_tiles: f32,
    pub(crate) hp: i32,
    pub(crate) reward: u32,
    pub(crate) alive: bool,
    pub(crate) rewarded: bool,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    enemy: Option<EnemyState>,
}

/// Slot arena that keeps enemies in spawn order.
#[derive(Debug, Default)]
pub(crate) struct EnemyRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<EnemyId>,
}

impl EnemyRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores a new enemy at the back of the iteration order.
    pub(crate) fn insert(&mut self, enemy: EnemyState) -> EnemyId {
        let slot_index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[slot_index as usize];
        slot.enemy = Some(enemy);
        let id = EnemyId::new(slot_index, slot.generation);
        self.order.push(id);
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&EnemyState> {
        self.slots
            .get(id.slot() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.enemy.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut EnemyState> {
        self.slots
            .get_mut(id.slot() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.enemy.as_mut())
    }

    /// Identifiers in spawn order, including enemies awaiting pruning.
    pub(crate) fn ids(&self) -> Vec<EnemyId> {
        self.order.clone()
    }

    /// Iterates enemies in spawn order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (EnemyId, &EnemyState)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.get(*id).map(|enemy| (*id, enemy)))
    }

    /// Subtracts hit points from a live enemy.
    ///
    /// Returns the reward the first time the enemy drops to zero hit points.
    pub(crate) fn apply_damage(&mut self, id: EnemyId, damage: u32) -> Option<u32> {
        let enemy = self.get_mut(id)?;
        if !enemy.alive {
            return None;
        }
        enemy.hp = enemy.hp.saturating_sub(damage.min(i32::MAX as u32) as i32);
        if enemy.hp > 0 {
            return None;
        }
        enemy.alive = false;
        if enemy.rewarded {
            return None;
        }
        enemy.rewarded = true;
        Some(enemy.reward)
    }

    /// Drops dead enemies, bumping the generation of every freed slot.
    pub(crate) fn prune(&mut self) {
        let mut kept = Vec::with_capacity(self.order.len());
        for id in std::mem::take(&mut self.order) {
            let alive = self.get(id).is_some_and(|enemy| enemy.alive);
            if alive {
                kept.push(id);
            } else {
                self.release(id);
            }
        }
        self.order = kept;
    }

    /// Removes every enemy.
    pub(crate) fn clear(&mut self) {
        for id in std::mem::take(&mut self.order) {
            self.release(id);
        }
    }

    fn release(&mut self, id: EnemyId) {
        if let Some(slot) = self.slots.get_mut(id.slot() as usize) {
            if slot.generation == id.generation() && slot.enemy.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.slot());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(hp: i32, reward: u32) -> EnemyState {
        EnemyState {
            kind: EnemyKind::Basic,
            route: 0,
            path_index: 0,
            position: WorldPoint::default(),
            speed_tiles: 1.0,
            hp,
            reward,
            alive: true,
            rewarded: false,
        }
    }

    #[test]
    fn reward_is_paid_once_for_overkill() {
        let mut registry = EnemyRegistry::new();
        let id = registry.insert(enemy(1, 7));

        assert_eq!(registry.apply_damage(id, 1), Some(7));
        assert_eq!(registry.apply_damage(id, 1), None);
        assert!(registry.iter().all(|(_, enemy)| !enemy.alive));
    }

    #[test]
    fn surviving_damage_pays_nothing() {
        let mut registry = EnemyRegistry::new();
        let id = registry.insert(enemy(5, 7));

        assert_eq!(registry.apply_damage(id, 2), None);
        assert_eq!(registry.get(id).map(|enemy| enemy.hp), Some(3));
    }

    #[test]
    fn pruned_slots_invalidate_stale_identifiers() {
        let mut registry = EnemyRegistry::new();
        let first = registry.insert(enemy(1, 1));
        let _ = registry.apply_damage(first, 1);
        registry.prune();

        assert!(registry.get(first).is_none());
        let second = registry.insert(enemy(3, 1));
        assert_eq!(second.slot(), first.slot());
        assert_ne!(second.generation(), first.generation());
        assert!(registry.get(first).is_none());
        assert!(registry.get(second).is_some());
    }

    #[test]
    fn iteration_follows_spawn_order() {
        let mut registry = EnemyRegistry::new();
        let a = registry.insert(enemy(1, 1));
        let b = registry.insert(enemy(2, 1));
        let _ = registry.apply_damage(a, 1);
        registry.prune();
        let c = registry.insert(enemy(3, 1));

        let order: Vec<EnemyId> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn clear_removes_everything() {
        let mut registry = EnemyRegistry::new();
        let id = registry.insert(enemy(1, 1));
        registry.clear();
        assert!(registry.get(id).is_none());
        assert!(registry.ids().is_empty());
    }
}
