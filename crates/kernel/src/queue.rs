use flatworld_common::EntityId;

/// Entities waiting to be destroyed at the start of the next tick.
///
/// An id appears at most once; marks keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct DeletionQueue {
    pending: Vec<EntityId>,
}

impl DeletionQueue {
    /// Mark `id`. Returns false if it was already marked.
    pub fn mark(&mut self, id: EntityId) -> bool {
        if self.pending.contains(&id) {
            return false;
        }
        self.pending.push(id);
        true
    }

    /// Forget a mark, e.g. because the entity was removed directly.
    pub fn unmark(&mut self, id: EntityId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| *p != id);
        self.pending.len() != before
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every mark, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending)
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.pending.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marking_twice_is_a_noop() {
        let mut q = DeletionQueue::default();
        assert!(q.mark(EntityId(1)));
        assert!(!q.mark(EntityId(1)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn drain_keeps_order_and_clears() {
        let mut q = DeletionQueue::default();
        q.mark(EntityId(3));
        q.mark(EntityId(1));
        q.mark(EntityId(2));
        assert_eq!(q.drain(), vec![EntityId(3), EntityId(1), EntityId(2)]);
        assert!(q.is_empty());
    }

    #[test]
    fn unmark_removes_only_that_id() {
        let mut q = DeletionQueue::default();
        q.mark(EntityId(1));
        q.mark(EntityId(2));
        assert!(q.unmark(EntityId(1)));
        assert!(!q.unmark(EntityId(1)));
        assert!(!q.contains(EntityId(1)));
        assert!(q.contains(EntityId(2)));
    }
}
