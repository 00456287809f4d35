//! Fixed-capacity object pools
//!
//! Slots are claimed first-fit and released by clearing `active`. A full pool
//! drops spawn requests; capacity never grows.

use super::state::GameObject;

/// Index of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

#[derive(Debug, Clone)]
pub struct Pool<const N: usize> {
    slots: [GameObject; N],
}

impl<const N: usize> Default for Pool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Pool<N> {
    pub const CAPACITY: usize = N;

    pub fn new() -> Self {
        Self {
            slots: [GameObject::INACTIVE; N],
        }
    }

    /// First inactive slot, if any
    pub fn free_slot(&self) -> Option<SlotId> {
        self.slots.iter().position(|o| !o.active).map(SlotId)
    }

    /// Place `object` in the first free slot. Returns `None` (and drops the
    /// object) when every slot is taken.
    pub fn spawn(&mut self, mut object: GameObject) -> Option<SlotId> {
        let id = self.free_slot()?;
        object.active = true;
        self.slots[id.0] = object;
        Some(id)
    }

    pub fn release(&mut self, id: SlotId) {
        self.slots[id.0].active = false;
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    pub fn get(&self, id: SlotId) -> &GameObject {
        &self.slots[id.0]
    }

    pub fn get_mut(&mut self, id: SlotId) -> &mut GameObject {
        &mut self.slots[id.0]
    }

    /// All slots in index order, free ones included
    pub fn slots(&self) -> &[GameObject] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [GameObject] {
        &mut self.slots
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &GameObject)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, o)| o.active)
            .map(|(i, o)| (SlotId(i), o))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|o| o.active).count()
    }

    /// No active objects
    pub fn is_empty(&self) -> bool {
        !self.slots.iter().any(|o| o.active)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|o| o.active)
    }
}
