use flatworld_common::{Aabb, EntityId};
use flatworld_kernel::{Solidness, WorldManager};
use glam::Vec2;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// the CLI's status output.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &WorldManager) -> WorldSummary {
        let scene = world.scene();
        WorldSummary {
            last_step: world.last_step(),
            entity_count: world.entity_count(),
            active: scene.active_ids().count(),
            inactive: scene.inactive_ids().count(),
            pending_deletions: world.pending_deletions().len(),
            view: world.view(),
            following: world.following(),
        }
    }

    /// Describe a single entity, or `None` if it does not exist.
    pub fn inspect_entity(world: &WorldManager, id: EntityId) -> Option<EntityInfo> {
        world.get(id).map(|entity| {
            let body = entity.body();
            EntityInfo {
                id,
                kind: body.kind.clone(),
                position: body.position,
                velocity: body.velocity,
                altitude: body.altitude,
                solidness: body.solidness,
                active: world.scene().is_active(id),
                marked: world.pending_deletions().contains(id),
            }
        })
    }

    /// List all entity ids in registry order.
    pub fn list_entities(world: &WorldManager) -> Vec<EntityId> {
        world.all_entities()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub last_step: Option<u64>,
    pub entity_count: usize,
    pub active: usize,
    pub inactive: usize,
    pub pending_deletions: usize,
    pub view: Aabb,
    pub following: Option<EntityId>,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last_step {
            Some(step) => write!(f, "World: step={step}")?,
            None => write!(f, "World: step=-")?,
        }
        write!(
            f,
            " entities={} (active={} inactive={}) pending_deletions={} view=({:.1}, {:.1})",
            self.entity_count,
            self.active,
            self.inactive,
            self.pending_deletions,
            self.view.corner.x,
            self.view.corner.y,
        )?;
        if let Some(id) = self.following {
            write!(f, " following={id}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub altitude: i32,
    pub solidness: Solidness,
    pub active: bool,
    pub marked: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity {} '{}' pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) alt={} {:?}",
            self.id,
            self.kind,
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.altitude,
            self.solidness,
        )?;
        if !self.active {
            write!(f, " [inactive]")?;
        }
        if self.marked {
            write!(f, " [marked]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatworld_kernel::{Body, Prop};

    fn spawn(world: &mut WorldManager, kind: &str, x: f32, y: f32) -> EntityId {
        let body = Body {
            position: Vec2::new(x, y),
            ..Body::new(kind)
        };
        world.insert_with_policy(Box::new(Prop::new(body, '#'))).unwrap()
    }

    #[test]
    fn summary_empty_world() {
        let world = WorldManager::default();
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.last_step, None);
        assert_eq!(summary.entity_count, 0);
    }

    #[test]
    fn summary_with_entities() {
        let mut world = WorldManager::default();
        let a = spawn(&mut world, "rock", 1.0, 1.0);
        let b = spawn(&mut world, "rock", 3.0, 1.0);
        spawn(&mut world, "rock", 5.0, 1.0);
        world.set_active(a, false).unwrap();
        world.mark_for_delete(b).unwrap();
        world.follow_entity(Some(a)).unwrap();

        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.entity_count, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.inactive, 1);
        assert_eq!(summary.pending_deletions, 1);
        assert_eq!(summary.following, Some(a));

        world.tick(1);
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.last_step, Some(1));
        assert_eq!(summary.entity_count, 2);
        assert_eq!(summary.pending_deletions, 0);
    }

    #[test]
    fn inspect_entity_found() {
        let mut world = WorldManager::default();
        let id = spawn(&mut world, "crate", 1.0, 2.0);
        world.mark_for_delete(id).unwrap();

        let info = WorldInspector::inspect_entity(&world, id).unwrap();
        assert_eq!(info.kind, "crate");
        assert_eq!(info.position, Vec2::new(1.0, 2.0));
        assert!(info.active);
        assert!(info.marked);
        assert!(info.to_string().contains("[marked]"));
    }

    #[test]
    fn inspect_entity_not_found() {
        let world = WorldManager::default();
        assert!(WorldInspector::inspect_entity(&world, EntityId(42)).is_none());
    }

    #[test]
    fn list_entities_in_insertion_order() {
        let mut world = WorldManager::default();
        let id1 = spawn(&mut world, "a", 1.0, 1.0);
        let id2 = spawn(&mut world, "b", 3.0, 1.0);
        assert_eq!(WorldInspector::list_entities(&world), vec![id1, id2]);
    }

    #[test]
    fn summary_display() {
        let world = WorldManager::default();
        let s = WorldInspector::summary(&world).to_string();
        assert!(s.contains("step=-"));
        assert!(s.contains("entities=0"));
    }
}
