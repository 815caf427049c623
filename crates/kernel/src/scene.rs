use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use flatworld_common::{Aabb, EntityId};

use crate::entity::Entity;

/// Exclusive owner of every live entity.
///
/// One BTreeMap holds the entities; ids grow monotonically, so iteration is
/// insertion order. The active, solid and per-altitude buckets are derived
/// from entity state on demand and never cached.
pub struct SceneGraph {
    entities: BTreeMap<EntityId, Box<dyn Entity>>,
    inactive: BTreeSet<EntityId>,
    next_id: EntityId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            inactive: BTreeSet::new(),
            next_id: EntityId(1),
        }
    }
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("entities", &self.entities.len())
            .field("inactive", &self.inactive)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `entity` as an active member. Returns its new id.
    pub fn insert(&mut self, entity: Box<dyn Entity>) -> EntityId {
        let id = self.next_id;
        self.next_id = id.next();
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity from every bucket and hand it back.
    pub fn remove(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        self.inactive.remove(&id);
        self.entities.remove(&id)
    }

    /// Drop everything. Returns how many entities were destroyed.
    pub fn clear(&mut self) -> usize {
        let count = self.entities.len();
        self.inactive.clear();
        self.entities.clear();
        count
    }

    /// True if `id` is a live entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Look up an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(&id).map(|e| &**e)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut (dyn Entity + 'static)> {
        self.entities.get_mut(&id).map(|e| &mut **e)
    }

    /// Number of live entities, active or not.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Every entity id in registry order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Every entity in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &dyn Entity)> + '_ {
        self.entities.iter().map(|(id, e)| (*id, &**e))
    }

    /// True if `id` is live and in the active set.
    pub fn is_active(&self, id: EntityId) -> bool {
        self.contains(id) && !self.inactive.contains(&id)
    }

    /// Move an entity between the active and inactive sets.
    /// Returns false if the id is unknown.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        if active {
            self.inactive.remove(&id);
        } else {
            self.inactive.insert(id);
        }
        true
    }

    /// Active ids in registry order.
    pub fn active_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids().filter(|id| !self.inactive.contains(id))
    }

    /// Inactive ids in registry order.
    pub fn inactive_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.inactive.iter().copied()
    }

    /// Active entities in registry order.
    pub fn active(&self) -> impl Iterator<Item = (EntityId, &dyn Entity)> + '_ {
        self.iter().filter(|(id, _)| !self.inactive.contains(id))
    }

    /// Solid entities, active or not.
    pub fn solid_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter()
            .filter(|(_, e)| e.body().is_solid())
            .map(|(id, _)| id)
    }

    /// Active entities to draw, bucketed by altitude `0..=max_altitude`.
    ///
    /// An entity qualifies when its world box intersects `view` or it is
    /// view-relative. Altitudes outside the range are skipped.
    pub fn visible_by_altitude(&self, view: &Aabb, max_altitude: i32) -> Vec<Vec<EntityId>> {
        let layers = usize::try_from(max_altitude).map_or(0, |m| m + 1);
        let mut buckets = vec![Vec::new(); layers];
        for (id, entity) in self.active() {
            let body = entity.body();
            let Some(bucket) = usize::try_from(body.altitude)
                .ok()
                .and_then(|alt| buckets.get_mut(alt))
            else {
                continue;
            };
            if body.view_relative || body.world_box().intersects(view) {
                bucket.push(id);
            }
        }
        buckets
    }
}
