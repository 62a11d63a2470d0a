//! Fixed-size holding area for groups awaiting placement.

use slotfall_core::{PieceGroup, PlacementError, QueueFillError, QueueSlot};

/// Owns the pending groups, one optional group per queue position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueState {
    slots: Vec<Option<PieceGroup>>,
}

impl QueueState {
    /// Creates a queue with `capacity` empty positions.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Number of queue positions.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Group waiting in `slot`, if any. `None` for unknown positions.
    #[must_use]
    pub fn group(&self, slot: QueueSlot) -> Option<&PieceGroup> {
        self.index(slot)
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
    }

    /// Reports whether `slot` exists and holds no group.
    #[must_use]
    pub fn is_empty_slot(&self, slot: QueueSlot) -> bool {
        self.index(slot)
            .and_then(|index| self.slots.get(index))
            .is_some_and(Option::is_none)
    }

    /// Reports whether every queue position is empty.
    #[must_use]
    pub fn all_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Queue positions that hold no group, in ascending order.
    #[must_use]
    pub fn empty_slots(&self) -> Vec<QueueSlot> {
        self.positions()
            .filter(|(_, group)| group.is_none())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Iterator over every position and its group.
    pub fn positions(&self) -> impl Iterator<Item = (QueueSlot, Option<&PieceGroup>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, group)| {
                u32::try_from(index)
                    .ok()
                    .map(|value| (QueueSlot::new(value), group.as_ref()))
            })
    }

    /// Checks that `slot` can receive a new group.
    pub fn ensure_vacant(&self, slot: QueueSlot) -> Result<(), QueueFillError> {
        let entry = self
            .index(slot)
            .and_then(|index| self.slots.get(index))
            .ok_or(QueueFillError::UnknownSlot)?;
        if entry.is_some() {
            return Err(QueueFillError::SlotOccupied);
        }
        Ok(())
    }

    /// Stores `group` in `slot` if the position exists and is empty.
    pub fn fill(&mut self, slot: QueueSlot, group: PieceGroup) -> Result<(), QueueFillError> {
        self.ensure_vacant(slot)?;
        let index = self.index(slot).ok_or(QueueFillError::UnknownSlot)?;
        self.slots[index] = Some(group);
        Ok(())
    }

    /// Picks up the group in `slot`, leaving the position empty.
    pub fn take(&mut self, slot: QueueSlot) -> Result<PieceGroup, PlacementError> {
        let entry = self
            .index(slot)
            .and_then(|index| self.slots.get_mut(index))
            .ok_or(PlacementError::UnknownQueueSlot)?;
        entry.take().ok_or(PlacementError::EmptyQueueSlot)
    }

    /// Total number of pieces waiting in the queue.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .map(|group| group.pieces().len())
            .sum()
    }

    fn index(&self, slot: QueueSlot) -> Option<usize> {
        let index = usize::try_from(slot.get()).ok()?;
        (index < self.slots.len()).then_some(index)
    }
}
