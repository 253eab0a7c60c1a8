//! The narrow surface between the carousel logic and whatever plays it back.

use crate::arrangement::ItemId;
use crate::easing::Easing;
use crate::geometry::{Point, Rect, SectionId, Size};
use crate::handoff::HandoffPlan;
use crate::planner::{FocusPlan, MotionPlan, Placement};
use crate::reveal::{ParallaxPlan, RevealPlan};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("render target unavailable: {0}")]
    RenderTargetUnavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A bowl; `position` is its center relative to the carousel origin.
    Item(ItemId),
    /// The handoff duplicate; `position` is its top-left on the page.
    Clone,
    /// The wooden tray under the bowls; only `rotation` applies.
    Tray,
    /// The whole page; only `opacity` applies.
    Page,
    /// Body copy of a feature section; `position.y` is its lift below rest.
    FeatureText(usize),
    /// Heading of a feature section, lifted like the body copy.
    FeatureHeading(usize),
    /// Backdrop of a feature section; `position.y` is the background's
    /// vertical position in percent.
    FeatureBackdrop(usize),
}

/// Sparse property set. `None` leaves a property alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Props {
    pub position: Option<Point>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    /// Never tweened: applied at the start of an animation when `true`,
    /// at the end when `false`.
    pub displayed: Option<bool>,
}

impl Props {
    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn displayed(mut self, displayed: bool) -> Self {
        self.displayed = Some(displayed);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drops every property that `other` sets.
    pub fn without(mut self, other: &Props) -> Self {
        if other.position.is_some() {
            self.position = None;
        }
        if other.scale.is_some() {
            self.scale = None;
        }
        if other.rotation.is_some() {
            self.rotation = None;
        }
        if other.opacity.is_some() {
            self.opacity = None;
        }
        if other.displayed.is_some() {
            self.displayed = None;
        }
        self
    }
}

/// Identifies one rotation; the stage reports it back once per finished motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub duration: Duration,
    pub easing: Easing,
    /// Wait before the tween starts moving.
    pub delay: Duration,
    /// Applied instantly once the tween completes.
    pub then: Option<Props>,
    pub notify: Option<SettleToken>,
}

impl Tween {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
            then: None,
            notify: None,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn then(mut self, props: Props) -> Self {
        self.then = Some(props);
        self
    }

    pub fn notify(mut self, token: SettleToken) -> Self {
        self.notify = Some(token);
        self
    }
}

pub trait Animator {
    fn animate(&mut self, target: Target, to: Props, tween: Tween);
    fn set(&mut self, target: Target, props: Props);
}

pub trait ScrollController {
    fn smooth_scroll_to(
        &mut self,
        section: &SectionId,
        offset: f64,
        duration: Duration,
        easing: Easing,
    );
    fn set_locked(&mut self, locked: bool);
}

/// Read access to the rendered page, for the handoff snapshot.
pub trait SceneProbe {
    fn item_rect(&self, item: ItemId) -> Option<Rect>;
    fn item_scale(&self, item: ItemId) -> Option<f64>;
    fn item_rotation(&self, item: ItemId) -> Option<f64>;
    fn anchor_rect(&self) -> Option<Rect>;
    fn viewport(&self) -> Size;
}

/// Instructions emitted by the session, replayed through [`perform`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    Place(Vec<Placement>),
    Motion {
        plans: Vec<MotionPlan>,
        token: SettleToken,
    },
    Focus(Vec<FocusPlan>),
    TurnTray {
        angle: f64,
        duration: Duration,
    },
    LockScroll(bool),
    Handoff(HandoffPlan),
    Reveal(Vec<RevealPlan>),
    Parallax(Vec<ParallaxPlan>),
}

pub fn perform<A, S>(cue: &Cue, animator: &mut A, scroller: &mut S)
where
    A: Animator + ?Sized,
    S: ScrollController + ?Sized,
{
    match cue {
        Cue::Place(placements) => {
            for p in placements {
                animator.set(
                    Target::Item(p.item),
                    Props::default()
                        .position(p.position)
                        .scale(p.scale)
                        .rotation(p.rotation)
                        .opacity(p.opacity)
                        .displayed(p.displayed),
                );
            }
        }
        Cue::Motion { plans, token } => {
            for plan in plans {
                play_motion(plan, *token, animator);
            }
        }
        Cue::Focus(plans) => {
            for plan in plans {
                animator.animate(
                    Target::Item(plan.item),
                    Props::default().scale(plan.scale).rotation(plan.rotation),
                    Tween::new(plan.duration, plan.easing),
                );
            }
        }
        Cue::TurnTray { angle, duration } => {
            animator.animate(
                Target::Tray,
                Props::default().rotation(*angle),
                Tween::new(*duration, Easing::Power2InOut),
            );
        }
        Cue::LockScroll(locked) => scroller.set_locked(*locked),
        Cue::Handoff(plan) => play_handoff(plan, animator, scroller),
        Cue::Reveal(plans) => {
            for plan in plans {
                let to = Props::default()
                    .position(Point::new(0.0, plan.lift))
                    .opacity(plan.opacity);
                if plan.duration.is_zero() && plan.delay.is_zero() {
                    animator.set(plan.target, to);
                } else {
                    animator.animate(
                        plan.target,
                        to,
                        Tween::new(plan.duration, plan.easing).delay(plan.delay),
                    );
                }
            }
        }
        Cue::Parallax(plans) => {
            for plan in plans {
                animator.set(
                    plan.target,
                    Props::default().position(Point::new(0.0, plan.background_y)),
                );
            }
        }
    }
}

fn play_motion<A: Animator + ?Sized>(plan: &MotionPlan, token: SettleToken, animator: &mut A) {
    match *plan {
        MotionPlan::MoveTo {
            item,
            destination,
            scale,
            reveal,
            duration,
            easing,
            ..
        } => {
            let mut to = Props::default()
                .position(destination)
                .scale(scale)
                .opacity(1.0);
            if reveal {
                to = to.displayed(true);
            }
            animator.animate(
                Target::Item(item),
                to,
                Tween::new(duration, easing).notify(token),
            );
        }
        MotionPlan::ExitOffscreen {
            item,
            target,
            final_scale,
            final_opacity,
            duration,
            easing,
            staging,
            ..
        } => {
            animator.animate(
                Target::Item(item),
                Props::default()
                    .position(target)
                    .scale(final_scale)
                    .opacity(final_opacity),
                Tween::new(duration, easing)
                    .then(Props::default().displayed(false).position(staging))
                    .notify(token),
            );
        }
    }
}

fn play_handoff<A, S>(plan: &HandoffPlan, animator: &mut A, scroller: &mut S)
where
    A: Animator + ?Sized,
    S: ScrollController + ?Sized,
{
    let flight = &plan.flight;
    animator.set(Target::Item(plan.original), Props::default().opacity(0.0));
    animator.set(
        Target::Clone,
        Props::default()
            .position(flight.from)
            .scale(flight.from_scale)
            .rotation(flight.from_rotation)
            .opacity(1.0)
            .displayed(true),
    );
    animator.animate(
        Target::Clone,
        Props::default()
            .position(flight.to)
            .scale(flight.to_scale)
            .rotation(flight.to_rotation),
        Tween::new(flight.duration, flight.easing),
    );
    scroller.smooth_scroll_to(
        &plan.scroll.section,
        plan.scroll.offset,
        plan.scroll.duration,
        plan.scroll.easing,
    );
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, replay};
    use super::*;
    use crate::arrangement::Arrangement;
    use crate::handoff::{FocalSnapshot, HandoffChoreographer};
    use crate::planner::plan_transition;
    use crate::slot::SlotLayout;
    use crate::tuning::Timing;

    #[test]
    fn exits_park_the_item_when_done() {
        let old = Arrangement::identity();
        let new = old.rotated_forward().unwrap();
        let plans = plan_transition(&old, &new, &SlotLayout::default(), &Timing::default());
        let calls = replay(&[Cue::Motion {
            plans,
            token: SettleToken(7),
        }]);

        assert_eq!(calls.len(), 5);
        let exit = calls
            .iter()
            .find_map(|c| match c {
                Call::Animate(Target::Item(id), to, tween) if *id == ItemId::new(2) => {
                    Some((*to, *tween))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(exit.0.opacity, Some(0.0));
        assert_eq!(exit.1.notify, Some(SettleToken(7)));
        assert_eq!(
            exit.1.then,
            Some(
                Props::default()
                    .displayed(false)
                    .position(Point::new(-150.0, 100.0))
            )
        );
    }

    #[test]
    fn reveal_displays_the_item_before_travel() {
        let old = Arrangement::identity();
        let new = old.rotated_forward().unwrap();
        let plans = plan_transition(&old, &new, &SlotLayout::default(), &Timing::default());
        let calls = replay(&[Cue::Motion {
            plans,
            token: SettleToken(1),
        }]);
        assert!(calls.iter().any(|c| matches!(
            c,
            Call::Animate(Target::Item(id), to, _)
                if *id == ItemId::new(3) && to.displayed == Some(true)
        )));
    }

    #[test]
    fn handoff_hides_original_and_scrolls() {
        let plan = HandoffChoreographer::default()
            .plan(
                FocalSnapshot {
                    item: ItemId::new(0),
                    rect: Rect::new(0.0, 0.0, 100.0, 100.0),
                    scale: 2.0,
                    rotation: 30.0,
                },
                Some(Rect::new(800.0, 900.0, 10.0, 10.0)),
                Size::new(1000.0, 800.0),
            )
            .unwrap();
        let calls = replay(&[Cue::Handoff(plan)]);

        assert_eq!(
            calls[0],
            Call::Set(Target::Item(ItemId::new(0)), Props::default().opacity(0.0))
        );
        assert!(matches!(calls[1], Call::Set(Target::Clone, p) if p.displayed == Some(true)));
        assert!(matches!(
            calls[2],
            Call::Animate(Target::Clone, p, t)
                if p.rotation == Some(0.0) && t.duration == Duration::from_millis(3000)
        ));
        assert_eq!(
            calls[3],
            Call::Scroll(
                SectionId::new("about"),
                Duration::from_millis(2000),
                Easing::DecaySteep
            )
        );
    }

    #[test]
    fn without_strips_overlapping_props() {
        let a = Props::default().position(Point::new(1.0, 2.0)).scale(2.0);
        let b = Props::default().scale(1.0).rotation(5.0);
        assert_eq!(a.without(&b), Props::default().position(Point::new(1.0, 2.0)));
        assert!(a.without(&a).is_empty());
    }
}
