use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};

pub const SLOT_COUNT: usize = 5;
pub const VISIBLE_SLOTS: usize = 3;
pub const CENTER_SLOT: usize = 0;

/// Where exiting items are parked so re-entry always starts from one place.
pub const STAGING_POSITION: Point = Point { x: -150.0, y: 100.0 };
pub const EXIT_DISTANCE: f64 = 200.0; // horizontal travel past the current position
pub const EXIT_SCALE: f64 = 0.3;
pub const HIDDEN_SCALE: f64 = 0.5; // resting scale of parked items
pub const FOCUS_ZOOM: f64 = 1.2;
pub const FOCUS_TILT_DEG: f64 = 30.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, StrumDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SlotRole {
    Center,
    Left,
    Right,
    HiddenA,
    HiddenB,
}

impl SlotRole {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::iter().nth(idx)
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Center | Self::Left | Self::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub role: SlotRole,
    pub offset: Point,
    pub scale: f64,
}

impl SlotGeometry {
    pub const fn new(role: SlotRole, x: f64, y: f64, scale: f64) -> Self {
        Self {
            role,
            offset: Point { x, y },
            scale,
        }
    }

    pub fn visible(&self) -> bool {
        self.role.is_visible()
    }
}

/// Fixed geometry of the five display slots, indexed by `SlotRole::as_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotLayout {
    slots: [SlotGeometry; SLOT_COUNT],
    /// Items to the right of this x exit rightwards, the rest exit leftwards.
    pub exit_pivot: f64,
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self {
            slots: [
                SlotGeometry::new(SlotRole::Center, 180.0, 10.0, 1.8),
                SlotGeometry::new(SlotRole::Left, 10.0, 160.0, 1.2),
                SlotGeometry::new(SlotRole::Right, 10.0, -140.0, 0.9),
                SlotGeometry::new(SlotRole::HiddenA, -150.0, 200.0, 0.8),
                SlotGeometry::new(SlotRole::HiddenB, -150.0, -200.0, 0.7),
            ],
            exit_pivot: 0.0,
        }
    }
}

impl SlotLayout {
    pub fn slot(&self, index: usize) -> &SlotGeometry {
        &self.slots[index]
    }

    pub fn role(&self, role: SlotRole) -> &SlotGeometry {
        &self.slots[role.as_index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SlotGeometry)> {
        self.slots.iter().enumerate()
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|s| s.visible()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_three_slots_are_visible() {
        let layout = SlotLayout::default();
        assert_eq!(layout.visible_count(), VISIBLE_SLOTS);
        assert_eq!(
            layout
                .iter()
                .filter(|(_, s)| s.role == SlotRole::Center)
                .count(),
            1
        );
    }

    #[test]
    fn roles_line_up_with_indices() {
        let layout = SlotLayout::default();
        for (i, slot) in layout.iter() {
            assert_eq!(slot.role.as_index(), i);
            assert_eq!(SlotRole::from_index(i), Some(slot.role));
        }
        assert_eq!(layout.role(SlotRole::Center).offset, Point::new(180.0, 10.0));
    }

    #[test]
    fn role_names_are_kebab_case() {
        assert_eq!(SlotRole::HiddenA.to_string(), "hidden-a");
        let role: SlotRole = serde_json::from_str("\"hidden-b\"").unwrap();
        assert_eq!(role, SlotRole::HiddenB);
    }
}
