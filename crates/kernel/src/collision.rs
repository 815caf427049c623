use flatworld_common::{Aabb, EntityId};

use crate::scene::SceneGraph;

/// A hypothetical world-space region to test against the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    /// Entity doing the asking; never reported as its own collision.
    pub exclude: Option<EntityId>,
    pub region: Aabb,
}

/// Finds the solid, active entities overlapping a probe.
///
/// Implementations must be a pure function of the scene and the probe and
/// return ids in registry order, so a spatial index can replace the linear
/// scan without changing event order.
pub trait CollisionQuery {
    fn overlapping(&self, scene: &SceneGraph, probe: &Probe) -> Vec<EntityId>;
}

/// Checks every active entity. Fine for the entity counts of a single screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl CollisionQuery for LinearScan {
    fn overlapping(&self, scene: &SceneGraph, probe: &Probe) -> Vec<EntityId> {
        scene
            .active()
            .filter(|(id, _)| probe.exclude != Some(*id))
            .filter(|(_, e)| e.body().is_solid() && probe.region.intersects(&e.body().world_box()))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Body, Entity, Prop, Solidness};
    use glam::Vec2;

    fn insert(scene: &mut SceneGraph, x: f32, y: f32, solidness: Solidness) -> EntityId {
        let body = Body {
            position: Vec2::new(x, y),
            solidness,
            ..Body::default()
        };
        scene.insert(Box::new(Prop::new(body, '#')) as Box<dyn Entity>)
    }

    fn probe(exclude: Option<EntityId>, x: f32, y: f32) -> Probe {
        Probe {
            exclude,
            region: Aabb::new(Vec2::new(x, y), 1.0, 1.0),
        }
    }

    #[test]
    fn reports_overlaps_in_registry_order() {
        let mut scene = SceneGraph::new();
        let a = insert(&mut scene, 5.0, 5.0, Solidness::Hard);
        let b = insert(&mut scene, 5.5, 5.0, Solidness::Soft);
        insert(&mut scene, 9.0, 9.0, Solidness::Hard);
        let hits = LinearScan.overlapping(&scene, &probe(None, 5.2, 5.0));
        assert_eq!(hits, vec![a, b]);
    }

    #[test]
    fn never_reports_the_querier() {
        let mut scene = SceneGraph::new();
        let a = insert(&mut scene, 5.0, 5.0, Solidness::Hard);
        assert!(LinearScan.overlapping(&scene, &probe(Some(a), 5.0, 5.0)).is_empty());
    }

    #[test]
    fn skips_spectral_and_inactive() {
        let mut scene = SceneGraph::new();
        insert(&mut scene, 5.0, 5.0, Solidness::Spectral);
        let sleeping = insert(&mut scene, 5.0, 5.0, Solidness::Hard);
        scene.set_active(sleeping, false);
        assert!(LinearScan.overlapping(&scene, &probe(None, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn touching_boxes_do_not_collide() {
        let mut scene = SceneGraph::new();
        insert(&mut scene, 5.0, 5.0, Solidness::Hard);
        assert!(LinearScan.overlapping(&scene, &probe(None, 6.0, 5.0)).is_empty());
        assert!(LinearScan.overlapping(&scene, &probe(None, 5.0, 4.0)).is_empty());
    }
}
