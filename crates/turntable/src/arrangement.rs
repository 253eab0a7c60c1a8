use crate::slot::{CENTER_SLOT, SLOT_COUNT, SlotRole};
use derive_more::{Display, Into};
use strum::Display as StrumDisplay;
use thiserror::Error;

/// One of the five interchangeable bowls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Into)]
pub struct ItemId(u8);

impl ItemId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = ItemId> {
        (0..SLOT_COUNT as u8).map(ItemId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Rotation {
    Forward,
    Backward,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrangementError {
    #[error("arrangement {0:?} is not a permutation of the five items")]
    InvariantViolation([u8; SLOT_COUNT]),
}

/// Slot index to item: `items[slot] = item`. Always a permutation of `0..5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arrangement {
    items: [ItemId; SLOT_COUNT],
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Arrangement {
    pub fn identity() -> Self {
        Self {
            items: [0, 1, 2, 3, 4].map(ItemId),
        }
    }

    pub fn try_from_slots(raw: [u8; SLOT_COUNT]) -> Result<Self, ArrangementError> {
        let mut seen = [false; SLOT_COUNT];
        for &id in &raw {
            match seen.get_mut(id as usize) {
                Some(flag) if !*flag => *flag = true,
                _ => return Err(ArrangementError::InvariantViolation(raw)),
            }
        }
        Ok(Self {
            items: raw.map(ItemId),
        })
    }

    pub fn at(&self, slot: usize) -> ItemId {
        self.items[slot]
    }

    pub fn at_role(&self, role: SlotRole) -> ItemId {
        self.items[role.as_index()]
    }

    pub fn slot_of(&self, item: ItemId) -> usize {
        // permutation: every item occupies exactly one slot
        self.items
            .iter()
            .position(|&i| i == item)
            .unwrap_or(CENTER_SLOT)
    }

    pub fn role_of(&self, item: ItemId) -> SlotRole {
        SlotRole::from_index(self.slot_of(item)).unwrap_or(SlotRole::Center)
    }

    pub fn active_item(&self) -> ItemId {
        self.items[CENTER_SLOT]
    }

    pub fn as_slots(&self) -> [u8; SLOT_COUNT] {
        self.items.map(u8::from)
    }

    /// Left advances to center, center recedes to right, right exits to
    /// hidden-a, hidden-a enters at left, hidden-b stays parked.
    pub fn rotated_forward(&self) -> Result<Self, ArrangementError> {
        let [c, l, r, ha, hb] = self.as_slots();
        Self::try_from_slots([l, ha, c, r, hb])
    }

    /// Inverse of [`Arrangement::rotated_forward`].
    pub fn rotated_backward(&self) -> Result<Self, ArrangementError> {
        let [c, l, r, ha, hb] = self.as_slots();
        Self::try_from_slots([r, c, ha, l, hb])
    }

    pub fn rotated(&self, rotation: Rotation) -> Result<Self, ArrangementError> {
        match rotation {
            Rotation::Forward => self.rotated_forward(),
            Rotation::Backward => self.rotated_backward(),
        }
    }
}

/// Holds the live arrangement; rotations swap it atomically.
#[derive(Debug, Clone, Default)]
pub struct RotationState {
    current: Arrangement,
}

impl RotationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrangement(&self) -> Arrangement {
        self.current
    }

    pub fn active_item(&self) -> ItemId {
        self.current.active_item()
    }

    /// Returns `(old, new)` on success. On error the held arrangement is untouched.
    pub fn rotate(
        &mut self,
        rotation: Rotation,
    ) -> Result<(Arrangement, Arrangement), ArrangementError> {
        let old = self.current;
        let new = old.rotated(rotation).inspect_err(|e| {
            debug_assert!(false, "rotation broke the arrangement: {e}");
        })?;
        self.current = new;
        Ok((old, new))
    }

    pub fn rotate_forward(&mut self) -> Result<(Arrangement, Arrangement), ArrangementError> {
        self.rotate(Rotation::Forward)
    }

    pub fn rotate_backward(&mut self) -> Result<(Arrangement, Arrangement), ArrangementError> {
        self.rotate(Rotation::Backward)
    }
}
