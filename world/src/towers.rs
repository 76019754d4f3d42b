//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use machines_td_core::{
    EnemyId, GridPos, MapId, TowerId, TowerKind, TowerStats, WorldPoint, DRONE_RELOAD_TICKS,
    DRONE_SPEED,
};

/// Drone owned by a drone tower.
#[derive(Clone, Debug)]
pub(crate) struct DroneState {
    pub(crate) position: WorldPoint,
    /// Copied from the owning tower at construction.
    pub(crate) home: WorldPoint,
    pub(crate) speed: f32,
    pub(crate) reload_ticks: u32,
    pub(crate) cooldown: u32,
    pub(crate) target: Option<EnemyId>,
}

impl DroneState {
    fn stationed_at(home: WorldPoint) -> Self {
        Self {
            position: home,
            home,
            speed: DRONE_SPEED,
            reload_ticks: DRONE_RELOAD_TICKS,
            cooldown: 0,
            target: None,
        }
    }
}

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Region the tower was built on.
    pub(crate) map: MapId,
    /// Cell occupied by the tower.
    pub(crate) cell: GridPos,
    pub(crate) level: u32,
    pub(crate) stats: TowerStats,
    pub(crate) cooldown: u32,
    /// Construction cost plus every upgrade paid.
    pub(crate) invested: u32,
    pub(crate) drone: Option<DroneState>,
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Reports whether a tower already stands on the cell of the map.
    pub(crate) fn is_occupied(&self, map: MapId, cell: GridPos) -> bool {
        self.find_at(map, cell).is_some()
    }

    /// Tower standing on the cell of the map, if any.
    pub(crate) fn find_at(&self, map: MapId, cell: GridPos) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.map == map && tower.cell == cell)
            .map(|tower| tower.id)
    }

    /// Constructs a level-one tower and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, map: MapId, cell: GridPos) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let drone = match kind {
            TowerKind::Drone => Some(DroneState::stationed_at(cell.center())),
            TowerKind::Normal | TowerKind::Aoe => None,
        };
        let state = TowerState {
            id,
            kind,
            map,
            cell,
            level: 1,
            stats: TowerStats::for_kind(kind),
            cooldown: 0,
            invested: kind.purchase_cost(),
            drone,
        };
        let _ = self.entries.insert(id, state);
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Removes every tower and restarts identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn occupancy_is_tracked_per_map() {
        let mut registry = TowerRegistry::new();
        let cell = GridPos::new(3, 4);
        let id = registry.insert(TowerKind::Normal, MapId::Map1, cell);

        assert!(registry.is_occupied(MapId::Map1, cell));
        assert!(!registry.is_occupied(MapId::Map2, cell));
        assert_eq!(registry.find_at(MapId::Map1, cell), Some(id));
    }

    #[test]
    fn drone_towers_station_their_drone_at_home() {
        let mut registry = TowerRegistry::new();
        let cell = GridPos::new(2, 2);
        let id = registry.insert(TowerKind::Drone, MapId::Map1, cell);
        let drone = registry
            .get(id)
            .and_then(|tower| tower.drone.clone())
            .expect("drone tower owns a drone");

        assert_eq!(drone.home, cell.center());
        assert_eq!(drone.position, drone.home);
        assert_eq!(drone.cooldown, 0);
    }

    #[test]
    fn new_towers_record_purchase_cost_as_investment() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TowerKind::Aoe, MapId::Map2, GridPos::new(0, 0));
        let tower = registry.get(id).expect("tower");
        assert_eq!(tower.invested, 35);
        assert_eq!(tower.level, 1);
    }

    #[test]
    fn clear_restarts_identifiers() {
        let mut registry = TowerRegistry::new();
        let _ = registry.insert(TowerKind::Normal, MapId::Map1, GridPos::new(0, 0));
        registry.clear();
        let id = registry.insert(TowerKind::Normal, MapId::Map1, GridPos::new(0, 0));
        assert_eq!(id.get(), 0);
    }
}
