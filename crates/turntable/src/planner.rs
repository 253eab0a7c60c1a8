//! Turns an arrangement change into per-item motion descriptors. Nothing here
//! touches a renderer: the stage consumes these values.

use crate::arrangement::{Arrangement, ItemId};
use crate::easing::Easing;
use crate::geometry::Point;
use crate::slot::{
    EXIT_DISTANCE, EXIT_SCALE, FOCUS_TILT_DEG, FOCUS_ZOOM, HIDDEN_SCALE, STAGING_POSITION,
    SlotLayout, SlotRole,
};
use crate::tuning::Timing;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDirection {
    Left,
    Right,
}

impl ExitDirection {
    pub fn from_position(x: f64, pivot: f64) -> Self {
        if x > pivot { Self::Right } else { Self::Left }
    }

    pub fn sign(&self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionPlan {
    MoveTo {
        item: ItemId,
        dest_slot: usize,
        destination: Point,
        scale: f64,
        /// The item was parked and must be displayed before it travels.
        reveal: bool,
        duration: Duration,
        easing: Easing,
    },
    ExitOffscreen {
        item: ItemId,
        direction: ExitDirection,
        target: Point,
        final_scale: f64,
        final_opacity: f64,
        duration: Duration,
        easing: Easing,
        /// Parking spot applied once the exit completes.
        staging: Point,
    },
}

impl MotionPlan {
    pub fn item(&self) -> ItemId {
        match self {
            Self::MoveTo { item, .. } | Self::ExitOffscreen { item, .. } => *item,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::MoveTo { duration, .. } | Self::ExitOffscreen { duration, .. } => *duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusPlan {
    pub item: ItemId,
    pub scale: f64,
    pub rotation: f64,
    pub duration: Duration,
    pub easing: Easing,
}

/// Instant, unanimated state of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub item: ItemId,
    pub position: Point,
    pub scale: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub displayed: bool,
}

/// Where an item rests while it sits in `slot` of an arrangement.
pub fn resting_position(layout: &SlotLayout, slot: usize) -> Point {
    let geometry = layout.slot(slot);
    if geometry.visible() {
        geometry.offset
    } else {
        STAGING_POSITION
    }
}

pub fn plan_placement(arrangement: &Arrangement, layout: &SlotLayout) -> Vec<Placement> {
    ItemId::all()
        .map(|item| {
            let slot = arrangement.slot_of(item);
            let geometry = layout.slot(slot);
            if geometry.visible() {
                Placement {
                    item,
                    position: geometry.offset,
                    scale: geometry.scale,
                    rotation: 0.0,
                    opacity: 1.0,
                    displayed: true,
                }
            } else {
                Placement {
                    item,
                    position: STAGING_POSITION,
                    scale: HIDDEN_SCALE,
                    rotation: 0.0,
                    opacity: 0.0,
                    displayed: false,
                }
            }
        })
        .collect()
}

/// One plan per item. Exit direction follows the side of the pivot the item
/// currently sits on, so departing items keep travelling the way they face.
pub fn plan_transition(
    old: &Arrangement,
    new: &Arrangement,
    layout: &SlotLayout,
    timing: &Timing,
) -> Vec<MotionPlan> {
    ItemId::all()
        .map(|item| {
            let from_slot = old.slot_of(item);
            let to_slot = new.slot_of(item);
            let dest = layout.slot(to_slot);

            if dest.visible() {
                MotionPlan::MoveTo {
                    item,
                    dest_slot: to_slot,
                    destination: dest.offset,
                    scale: dest.scale,
                    reveal: !layout.slot(from_slot).visible(),
                    duration: timing.motion(),
                    easing: timing.motion_easing,
                }
            } else {
                let current = resting_position(layout, from_slot);
                let direction = ExitDirection::from_position(current.x, layout.exit_pivot);
                MotionPlan::ExitOffscreen {
                    item,
                    direction,
                    target: Point::new(current.x + direction.sign() * EXIT_DISTANCE, current.y),
                    final_scale: EXIT_SCALE,
                    final_opacity: 0.0,
                    duration: timing.motion(),
                    easing: timing.motion_easing,
                    staging: STAGING_POSITION,
                }
            }
        })
        .collect()
}

/// Zoom emphasis on the center item. Absolute targets, safe to re-run.
pub fn plan_focus(arrangement: &Arrangement, layout: &SlotLayout, timing: &Timing) -> Vec<FocusPlan> {
    layout
        .iter()
        .filter(|(_, geometry)| geometry.visible())
        .map(|(slot, geometry)| {
            let item = arrangement.at(slot);
            if geometry.role == SlotRole::Center {
                FocusPlan {
                    item,
                    scale: geometry.scale * FOCUS_ZOOM,
                    rotation: FOCUS_TILT_DEG,
                    duration: timing.focus(),
                    easing: Easing::Power1InOut,
                }
            } else {
                FocusPlan {
                    item,
                    scale: geometry.scale,
                    rotation: -FOCUS_TILT_DEG,
                    duration: timing.focus(),
                    easing: Easing::Power2Out,
                }
            }
        })
        .collect()
}
