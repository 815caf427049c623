use flatworld_common::EntityId;
use glam::Vec2;

use crate::entity::Entity;
use crate::queue::DeletionQueue;

/// Notifications delivered to entities.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The entity was updated during tick `step`.
    Step { step: u64 },
    /// A solid mover ran into another solid entity.
    Collision(Collision),
    /// The entity's box left the world boundary (`hard`) or the view.
    Out { hard: bool },
    /// World-wide notification sent through `WorldManager::broadcast`.
    Custom(String),
}

/// Both parties of a collision receive the same record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub mover: EntityId,
    pub other: EntityId,
    /// Position the mover tried to reach.
    pub attempted: Vec2,
}

impl Collision {
    pub fn involves(&self, id: EntityId) -> bool {
        self.mover == id || self.other == id
    }

    /// The other party, from `id`'s point of view.
    pub fn counterpart(&self, id: EntityId) -> Option<EntityId> {
        if self.mover == id {
            Some(self.other)
        } else if self.other == id {
            Some(self.mover)
        } else {
            None
        }
    }
}

/// Handle given to an entity while it handles an event.
///
/// Structural changes requested here are deferred: deletions go to the
/// deletion queue, spawns are inserted once the handler returns.
pub struct EventContext<'a> {
    id: EntityId,
    deletions: &'a mut DeletionQueue,
    spawns: &'a mut Vec<Box<dyn Entity>>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        id: EntityId,
        deletions: &'a mut DeletionQueue,
        spawns: &'a mut Vec<Box<dyn Entity>>,
    ) -> Self {
        Self {
            id,
            deletions,
            spawns,
        }
    }

    /// Id of the entity handling the event.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Queue `id` for destruction at the start of the next tick.
    pub fn mark_for_delete(&mut self, id: EntityId) -> bool {
        self.deletions.mark(id)
    }

    /// Queue the handling entity itself for destruction.
    pub fn delete_self(&mut self) -> bool {
        self.deletions.mark(self.id)
    }

    /// Request a new entity. It is inserted with its overlap policy after
    /// the current handler returns.
    pub fn spawn(&mut self, entity: Box<dyn Entity>) {
        self.spawns.push(entity);
    }
}
