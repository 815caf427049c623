use flatworld_common::{Aabb, EntityId};
use glam::Vec2;

use crate::collision::{CollisionQuery, LinearScan, Probe};
use crate::config::WorldConfig;
use crate::entity::{Body, Canvas, Entity};
use crate::error::{ConfigError, WorldError};
use crate::event::{Collision, Event, EventContext};
use crate::placement::{SpawnDecision, spiral_search};
use crate::queue::DeletionQueue;
use crate::scene::SceneGraph;
use crate::viewport::Viewport;

/// Result of [`WorldManager::attempt_move`]. Being blocked is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Blocked,
}

/// The authoritative world: owns every entity, moves them each tick,
/// resolves collisions, drives the camera and dispatches events.
///
/// Event handlers run synchronously inside `attempt_move`, `tick` and
/// `broadcast`. They can only request structural changes through their
/// [`EventContext`]; deletions wait for the next tick, spawns are inserted
/// as soon as the handler returns. Every pass iterates a snapshot of ids, so
/// those requests never disturb the iteration in progress.
pub struct WorldManager {
    config: WorldConfig,
    boundary: Aabb,
    viewport: Viewport,
    scene: SceneGraph,
    deletions: DeletionQueue,
    spawns: Vec<Box<dyn Entity>>,
    query: Box<dyn CollisionQuery>,
    last_step: Option<u64>,
}

impl Default for WorldManager {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl WorldManager {
    /// Create an empty world. The config is used as given; see
    /// [`WorldManager::from_config`] for the validating constructor.
    pub fn new(config: WorldConfig) -> Self {
        let boundary = config.boundary;
        let viewport = Viewport::new(config.view, config.view_slack, &boundary);
        tracing::info!(
            width = boundary.width(),
            height = boundary.height(),
            corner = ?boundary.corner,
            view = ?viewport.view().size,
            "world ready"
        );
        Self {
            config,
            boundary,
            viewport,
            scene: SceneGraph::new(),
            deletions: DeletionQueue::default(),
            spawns: Vec::new(),
            query: Box::new(LinearScan),
            last_step: None,
        }
    }

    /// Validate `config`, then create the world.
    pub fn from_config(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Replace the collision query, e.g. with a spatial index.
    pub fn with_collision_query(mut self, query: impl CollisionQuery + 'static) -> Self {
        self.query = Box::new(query);
        self
    }

    /// Configuration the world was built from.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Read-only view of the entity registry.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Number of entities in the world, active or not.
    pub fn entity_count(&self) -> usize {
        self.scene.len()
    }

    /// Look up an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.scene.get(id)
    }

    /// Mutable access to an entity. Moving it this way skips collision
    /// checks, camera tracking and out events.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut (dyn Entity + 'static)> {
        self.scene.get_mut(id)
    }

    /// Step index of the most recent tick.
    pub fn last_step(&self) -> Option<u64> {
        self.last_step
    }

    /// Every entity id in registry order.
    pub fn all_entities(&self) -> Vec<EntityId> {
        self.scene.ids().collect()
    }

    /// Active entities whose type tag equals `kind`.
    pub fn entities_of_kind(&self, kind: &str) -> Vec<EntityId> {
        self.scene
            .active()
            .filter(|(_, e)| e.body().kind == kind)
            .map(|(id, _)| id)
            .collect()
    }

    /// Insert an entity, applying its overlap policy if its spawn position
    /// overlaps existing solids.
    ///
    /// With [`crate::OverlapPolicy::SpawnAlways`] the entity is inserted even
    /// though it overlaps; untangling that is the caller's job.
    pub fn insert_with_policy(&mut self, mut entity: Box<dyn Entity>) -> Result<EntityId, WorldError> {
        let max = self.config.max_altitude;
        let body = entity.body();
        if !(0..=max).contains(&body.altitude) {
            return Err(WorldError::AltitudeOutOfRange {
                altitude: body.altitude,
                max,
            });
        }

        let origin = body.position;
        let overlaps = self.collisions_for(None, body, origin).len();
        if overlaps > 0 {
            let radius = self.config.placement_radius;
            let step = self.config.placement_step;
            let decision = body.overlap.resolve(origin, overlaps, radius, |origin| {
                spiral_search(origin, radius, step, |at| {
                    self.collisions_for(None, body, at).is_empty()
                })
            });
            match decision {
                SpawnDecision::Reject(reason) => {
                    tracing::warn!(kind = %body.kind, %reason, "spawn rejected");
                    return Err(WorldError::RejectedInsertion {
                        kind: body.kind.clone(),
                        reason,
                    });
                }
                SpawnDecision::Place { at, overlapping } => {
                    if overlapping {
                        tracing::warn!(
                            kind = %body.kind,
                            overlaps,
                            "spawn overlaps solids, inserting anyway"
                        );
                    } else {
                        tracing::debug!(kind = %body.kind, from = ?origin, to = ?at, "spawn relocated");
                    }
                    entity.body_mut().position = at;
                }
            }
        }

        let kind = entity.body().kind.clone();
        let id = self.scene.insert(entity);
        tracing::debug!(%id, %kind, "entity inserted");
        Ok(id)
    }

    /// Remove an entity immediately and hand it back. Any pending deletion
    /// mark for it is dropped so it cannot be destroyed twice.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Box<dyn Entity>, WorldError> {
        let entity = self.scene.remove(id).ok_or(WorldError::InvalidReference(id))?;
        self.deletions.unmark(id);
        if self.viewport.following() == Some(id) {
            self.viewport.set_following(None);
        }
        tracing::debug!(%id, "entity removed");
        Ok(entity)
    }

    /// Queue an entity for destruction at the start of the next tick.
    /// Returns `Ok(false)` if it was already queued.
    pub fn mark_for_delete(&mut self, id: EntityId) -> Result<bool, WorldError> {
        if !self.scene.contains(id) {
            return Err(WorldError::InvalidReference(id));
        }
        Ok(self.deletions.mark(id))
    }

    /// Entities queued for destruction at the next tick.
    pub fn pending_deletions(&self) -> &DeletionQueue {
        &self.deletions
    }

    /// Move an entity between the active and inactive sets.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> Result<(), WorldError> {
        if self.scene.set_active(id, active) {
            Ok(())
        } else {
            Err(WorldError::InvalidReference(id))
        }
    }

    /// Solid, active entities that `id` would overlap at `at`. Empty when
    /// `id` itself is not solid.
    pub fn query_collisions(&self, id: EntityId, at: Vec2) -> Result<Vec<EntityId>, WorldError> {
        let entity = self.scene.get(id).ok_or(WorldError::InvalidReference(id))?;
        Ok(self.collisions_for(Some(id), entity.body(), at))
    }

    fn collisions_for(&self, exclude: Option<EntityId>, body: &Body, at: Vec2) -> Vec<EntityId> {
        if !body.is_solid() {
            return Vec::new();
        }
        let probe = Probe {
            exclude,
            region: body.world_box_at(at),
        };
        self.query.overlapping(&self.scene, &probe)
    }

    /// Try to move `id` to `to`.
    ///
    /// Every solid entity in the way gets a collision event, the mover first.
    /// The move is blocked if a hard entity meets a hard one, or if the mover
    /// rejects soft contact and meets a soft one.
    pub fn attempt_move(&mut self, id: EntityId, to: Vec2) -> Result<MoveOutcome, WorldError> {
        let hits = self.query_collisions(id, to)?;
        let mut blocked = false;
        for other in hits {
            let event = Event::Collision(Collision {
                mover: id,
                other,
                attempted: to,
            });
            self.dispatch(id, &event);
            self.dispatch(other, &event);

            let (Some(mover), Some(obstacle)) = (self.scene.get(id), self.scene.get(other)) else {
                continue;
            };
            if mover.body().is_blocked_by(obstacle.body()) {
                blocked = true;
            }
        }
        if blocked {
            tracing::trace!(%id, to = ?to, "move blocked");
            return Ok(MoveOutcome::Blocked);
        }
        self.commit_move(id, to);
        Ok(MoveOutcome::Moved)
    }

    /// Move an already inserted entity to the nearest free ring cell.
    ///
    /// Returns the new position, or `None` if nothing within
    /// `placement_radius` is free, in which case nothing changes.
    pub fn relocate(&mut self, id: EntityId) -> Result<Option<Vec2>, WorldError> {
        let entity = self.scene.get(id).ok_or(WorldError::InvalidReference(id))?;
        let body = entity.body();
        let found = spiral_search(
            body.position,
            self.config.placement_radius,
            self.config.placement_step,
            |at| self.collisions_for(Some(id), body, at).is_empty(),
        );
        match found {
            Some(at) => self.commit_move(id, at),
            None => tracing::debug!(%id, "no free location nearby"),
        }
        Ok(found)
    }

    /// Set the position, let the camera follow, then report leaving the
    /// boundary (hard) or the view (soft). Hard takes priority.
    fn commit_move(&mut self, id: EntityId, to: Vec2) {
        let Some(entity) = self.scene.get_mut(id) else {
            return;
        };
        let before = entity.body().world_box();
        entity.body_mut().position = to;
        let after = entity.body().world_box();

        if self.viewport.following() == Some(id) {
            self.viewport.track(to, &self.boundary);
        }

        let view = self.viewport.view();
        let hard = before.intersects(&self.boundary) && !after.intersects(&self.boundary);
        let soft = before.intersects(&view) && !after.intersects(&view);
        if hard || soft {
            self.dispatch(id, &Event::Out { hard });
        }
    }

    /// Deliver `event` to one entity, then insert whatever it spawned.
    fn dispatch(&mut self, id: EntityId, event: &Event) -> Option<bool> {
        let entity = self.scene.get_mut(id)?;
        let mut cx = EventContext::new(id, &mut self.deletions, &mut self.spawns);
        let handled = entity.on_event(event, &mut cx);
        self.flush_spawns();
        Some(handled)
    }

    fn flush_spawns(&mut self) {
        for entity in std::mem::take(&mut self.spawns) {
            if let Err(err) = self.insert_with_policy(entity) {
                tracing::warn!(%err, "deferred spawn dropped");
            }
        }
    }

    /// Destroy everything queued for deletion. Returns how many were destroyed.
    fn flush_deletions(&mut self) -> usize {
        let mut destroyed = 0;
        for id in self.deletions.drain() {
            if self.viewport.following() == Some(id) {
                self.viewport.set_following(None);
            }
            if let Some(entity) = self.scene.remove(id) {
                tracing::debug!(%id, kind = %entity.body().kind, "entity destroyed");
                drop(entity);
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Advance the world by one tick.
    ///
    /// Pending deletions are processed first. Then every entity that was
    /// active at that point gets gravity applied, attempts the move to its
    /// predicted position and receives a step event, moved or not.
    pub fn tick(&mut self, step: u64) {
        let _span = tracing::info_span!("world_tick", step).entered();
        self.last_step = Some(step);

        let destroyed = self.flush_deletions();

        let snapshot: Vec<EntityId> = self.scene.active_ids().collect();
        let gravity = self.config.gravity;
        for &id in &snapshot {
            let Some(entity) = self.scene.get_mut(id) else {
                continue;
            };
            if entity.body().gravity {
                entity.body_mut().velocity += gravity;
            }
            let predicted = entity.predict_position();
            if predicted != entity.body().position {
                if let Err(err) = self.attempt_move(id, predicted) {
                    tracing::warn!(%id, %err, "move skipped");
                }
            }
            self.dispatch(id, &Event::Step { step });
        }

        tracing::trace!(
            destroyed,
            stepped = snapshot.len(),
            total = self.scene.len(),
            "tick complete"
        );
    }

    /// Draw layers `0..max_altitude` in ascending order. Only active entities
    /// that intersect the view, or are view-relative, are drawn. Returns the
    /// number of entities drawn.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> usize {
        let view = self.viewport.view();
        let layers = self.scene.visible_by_altitude(&view, self.config.max_altitude);
        let below_overlay = layers.len().saturating_sub(1);
        let ids = layers.into_iter().take(below_overlay).flatten();
        self.draw_ids(ids, canvas, &view)
    }

    /// Draw the reserved top layer (`max_altitude`), e.g. HUD entities.
    pub fn draw_overlay(&mut self, canvas: &mut dyn Canvas) -> usize {
        let view = self.viewport.view();
        let layers = self.scene.visible_by_altitude(&view, self.config.max_altitude);
        let top = layers.into_iter().last().unwrap_or_default();
        self.draw_ids(top, canvas, &view)
    }

    fn draw_ids(
        &mut self,
        ids: impl IntoIterator<Item = EntityId>,
        canvas: &mut dyn Canvas,
        view: &Aabb,
    ) -> usize {
        let mut drawn = 0;
        for id in ids {
            if let Some(entity) = self.scene.get_mut(id) {
                entity.draw(canvas, view);
                drawn += 1;
            }
        }
        drawn
    }

    /// Deliver `event` to every entity, active or not, in registry order.
    /// Returns how many entities received it.
    pub fn broadcast(&mut self, event: &Event) -> usize {
        let snapshot: Vec<EntityId> = self.scene.ids().collect();
        snapshot
            .into_iter()
            .filter_map(|id| self.dispatch(id, event))
            .count()
    }

    /// Current world boundary.
    pub fn boundary(&self) -> Aabb {
        self.boundary
    }

    /// Replace the world boundary and pull the view back inside it.
    pub fn set_world_bounds(&mut self, boundary: Aabb) {
        self.boundary = boundary;
        self.viewport.clamp_to(&boundary);
    }

    /// Current view box, always inside the boundary.
    pub fn view(&self) -> Aabb {
        self.viewport.view()
    }

    /// Replace the view box, clamped into the world boundary.
    pub fn set_view_bounds(&mut self, view: Aabb) {
        self.viewport.set_view(view, &self.boundary);
    }

    /// Dead-zone fractions of the view, each in `0..=1`.
    pub fn view_slack(&self) -> Vec2 {
        self.viewport.slack()
    }

    /// Set the dead-zone fractions; components are clamped to `0..=1`.
    pub fn set_view_slack(&mut self, slack: Vec2) {
        self.viewport.set_slack(slack);
    }

    /// Center the view on `center`, clamped into the boundary. Does not
    /// change which entity is followed.
    pub fn set_view_position(&mut self, center: Vec2) {
        self.viewport.center_on(center, &self.boundary);
    }

    /// The followed entity, if it still exists.
    pub fn following(&self) -> Option<EntityId> {
        self.viewport
            .following()
            .filter(|id| self.scene.contains(*id))
    }

    /// Follow `id` with the camera and center the view on it, or stop
    /// following with `None`. An unknown id leaves the current state alone.
    pub fn follow_entity(&mut self, id: Option<EntityId>) -> Result<(), WorldError> {
        let Some(id) = id else {
            self.viewport.set_following(None);
            return Ok(());
        };
        let position = self
            .scene
            .get(id)
            .ok_or(WorldError::InvalidReference(id))?
            .body()
            .position;
        self.viewport.set_following(Some(id));
        self.viewport.center_on(position, &self.boundary);
        Ok(())
    }

    /// Destroy every entity and forget pending work. Returns how many
    /// entities were destroyed.
    pub fn shutdown(&mut self) -> usize {
        self.deletions.drain();
        self.spawns.clear();
        self.viewport.set_following(None);
        let destroyed = self.scene.clear();
        tracing::info!(destroyed, "world shut down");
        destroyed
    }
}
