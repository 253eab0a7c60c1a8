//! The one-shot flight of the focal bowl into the about section.

use crate::arrangement::ItemId;
use crate::easing::Easing;
use crate::geometry::{Point, Rect, SectionId, Size};
use crate::tuning::HandoffTuning;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    #[error("handoff anchor is not on the page")]
    MissingAnchor,
    #[error("focal item {0} has no on-screen geometry")]
    FocalUnavailable(ItemId),
}

/// What the focal item looks like at the moment the gate fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalSnapshot {
    pub item: ItemId,
    /// Unscaled on-page rectangle.
    pub rect: Rect,
    pub scale: f64,
    pub rotation: f64,
}

/// The duplicate's travel. `from`/`to` are top-left corners in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneFlight {
    pub size: Size,
    pub from: Point,
    pub from_scale: f64,
    pub from_rotation: f64,
    pub to: Point,
    pub to_scale: f64,
    pub to_rotation: f64,
    pub duration: Duration,
    pub easing: Easing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportScroll {
    pub section: SectionId,
    pub offset: f64,
    pub duration: Duration,
    pub easing: Easing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandoffPlan {
    /// Hidden (opacity 0) but kept on the page.
    pub original: ItemId,
    pub flight: CloneFlight,
    pub scroll: ViewportScroll,
}

#[derive(Debug, Clone, Default)]
pub struct HandoffChoreographer {
    tuning: HandoffTuning,
}

impl HandoffChoreographer {
    pub fn new(tuning: HandoffTuning) -> Self {
        Self { tuning }
    }

    pub fn retune(&mut self, tuning: HandoffTuning) {
        self.tuning = tuning;
    }

    pub fn plan(
        &self,
        focal: FocalSnapshot,
        anchor: Option<Rect>,
        viewport: Size,
    ) -> Result<HandoffPlan, HandoffError> {
        let anchor = anchor.ok_or(HandoffError::MissingAnchor)?;
        let t = &self.tuning;
        let landing = anchor.top_left()
            + Point::new(t.offset_x, t.offset_y_viewport * viewport.height);

        Ok(HandoffPlan {
            original: focal.item,
            flight: CloneFlight {
                size: focal.rect.size,
                from: focal.rect.top_left(),
                from_scale: focal.scale,
                from_rotation: focal.rotation,
                to: landing,
                to_scale: t.final_scale,
                to_rotation: 0.0,
                duration: Duration::from_millis(t.flight_ms),
                easing: t.flight_easing,
            },
            scroll: ViewportScroll {
                section: t.target_section.clone(),
                offset: 0.0,
                duration: Duration::from_millis(t.scroll_ms),
                easing: t.scroll_easing,
            },
        })
    }
}
