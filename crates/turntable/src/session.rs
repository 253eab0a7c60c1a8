use crate::arrangement::{Arrangement, ItemId, Rotation, RotationState};
use crate::gate::{ScrollSample, TransitionGate};
use crate::handoff::{FocalSnapshot, HandoffChoreographer, HandoffError, HandoffPlan};
use crate::planner::{plan_focus, plan_placement, plan_transition};
use crate::scheduler::AutoAdvance;
use crate::slot::SlotLayout;
use crate::stage::{Cue, SceneProbe, SettleToken};
use crate::tuning::{Tuning, TuningError};
use std::time::Duration;

pub const INITIAL_TRAY_ANGLE: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    token: SettleToken,
    pending: usize,
}

/// One page session of the carousel. Every rotation entry point checks the
/// single `active` flag, which the handoff clears for good.
#[derive(Debug)]
pub struct CarouselSession {
    layout: SlotLayout,
    tuning: Tuning,
    rotation: RotationState,
    scheduler: AutoAdvance,
    gate: TransitionGate,
    choreographer: HandoffChoreographer,
    active: bool,
    torn_down: bool,
    in_flight: Option<InFlight>,
    next_token: u64,
    tray_angle: f64,
}

impl Default for CarouselSession {
    fn default() -> Self {
        Self::build(Tuning::default())
    }
}

impl CarouselSession {
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning))
    }

    fn build(tuning: Tuning) -> Self {
        Self {
            scheduler: AutoAdvance::new(tuning.timing.auto_advance(), tuning.timing.cooldown()),
            gate: TransitionGate::new(tuning.gate.threshold),
            choreographer: HandoffChoreographer::new(tuning.handoff.clone()),
            layout: SlotLayout::default(),
            tuning,
            rotation: RotationState::new(),
            active: true,
            torn_down: false,
            in_flight: None,
            next_token: 0,
            tray_angle: INITIAL_TRAY_ANGLE,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn arrangement(&self) -> Arrangement {
        self.rotation.arrangement()
    }

    pub fn active_item(&self) -> ItemId {
        self.rotation.active_item()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When the host must next call [`CarouselSession::tick`].
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.active {
            self.scheduler.next_deadline()
        } else {
            None
        }
    }

    /// Initial layout: lock the page, place every bowl, focus the center one
    /// and start auto-advancing.
    pub fn start(&mut self, now: Duration) -> Vec<Cue> {
        if !self.active {
            return Vec::new();
        }
        let arrangement = self.arrangement();
        self.scheduler.start(now);
        vec![
            Cue::LockScroll(true),
            Cue::Place(plan_placement(&arrangement, &self.layout)),
            Cue::Focus(plan_focus(&arrangement, &self.layout, &self.tuning.timing)),
        ]
    }

    pub fn tick(&mut self, now: Duration) -> Vec<Cue> {
        if !self.active || !self.scheduler.poll(now) {
            return Vec::new();
        }
        log::debug!("auto-advance at {}ms", now.as_millis());
        self.rotate(Rotation::Forward)
    }

    /// Keyboard rotation: pauses auto-advance first, then rotates once.
    pub fn manual(&mut self, rotation: Rotation, now: Duration) -> Vec<Cue> {
        if !self.active {
            log::debug!("ignoring {rotation} rotation, carousel is frozen");
            return Vec::new();
        }
        self.scheduler.pause_for_manual(now);

        let mut cues = self.rotate(rotation);
        if !cues.is_empty() {
            let step = self.tuning.timing.tray_step_deg;
            self.tray_angle += match rotation {
                Rotation::Forward => step,
                Rotation::Backward => -step,
            };
            cues.push(Cue::TurnTray {
                angle: self.tray_angle,
                duration: self.tuning.timing.tray_turn(),
            });
        }
        cues
    }

    fn rotate(&mut self, rotation: Rotation) -> Vec<Cue> {
        let (old, new) = match self.rotation.rotate(rotation) {
            Ok(change) => change,
            Err(e) => {
                log::error!("rotation aborted: {e}");
                return Vec::new();
            }
        };

        let plans = plan_transition(&old, &new, &self.layout, &self.tuning.timing);
        self.next_token += 1;
        let token = SettleToken(self.next_token);
        self.in_flight = Some(InFlight {
            token,
            pending: plans.len(),
        });
        log::debug!(
            "{rotation} rotation {:?} -> {:?}, active item {}",
            old.as_slots(),
            new.as_slots(),
            new.active_item()
        );
        vec![Cue::Motion { plans, token }]
    }

    /// Called once per finished motion. The focus pass follows the last one
    /// of the current rotation; reports from superseded rotations are ignored.
    pub fn motion_settled(&mut self, token: SettleToken) -> Vec<Cue> {
        if !self.active {
            return Vec::new();
        }
        match self.in_flight.as_mut() {
            Some(flight) if flight.token == token => {
                flight.pending = flight.pending.saturating_sub(1);
                if flight.pending > 0 {
                    return Vec::new();
                }
            }
            _ => return Vec::new(),
        }
        self.in_flight = None;
        vec![Cue::Focus(plan_focus(
            &self.arrangement(),
            &self.layout,
            &self.tuning.timing,
        ))]
    }

    pub fn scroll<P: SceneProbe + ?Sized>(&mut self, sample: ScrollSample, probe: &P) -> Vec<Cue> {
        if self.torn_down || !self.gate.observe(sample) {
            return Vec::new();
        }

        self.active = false;
        self.in_flight = None;
        self.scheduler.stop();
        log::info!(
            "handoff at {:.0}% of the landing section",
            sample.progress * 100.0
        );

        let mut cues = vec![Cue::LockScroll(false)];
        match self.plan_handoff(probe) {
            Ok(plan) => cues.push(Cue::Handoff(plan)),
            Err(e) => log::warn!("skipping handoff animation: {e}"),
        }
        cues
    }

    fn plan_handoff<P: SceneProbe + ?Sized>(&self, probe: &P) -> Result<HandoffPlan, HandoffError> {
        let item = self.active_item();
        let rect = probe
            .item_rect(item)
            .ok_or(HandoffError::FocalUnavailable(item))?;
        let focal = FocalSnapshot {
            item,
            rect,
            scale: probe.item_scale(item).unwrap_or(1.0),
            rotation: probe.item_rotation(item).unwrap_or(0.0),
        };
        self.choreographer
            .plan(focal, probe.anchor_rect(), probe.viewport())
    }

    pub fn retune(&mut self, tuning: Tuning) -> Result<(), TuningError> {
        tuning.validate()?;
        self.scheduler
            .retune(tuning.timing.auto_advance(), tuning.timing.cooldown());
        self.gate.set_threshold(tuning.gate.threshold);
        self.choreographer.retune(tuning.handoff.clone());
        self.tuning = tuning;
        Ok(())
    }

    /// Nothing fires after this; the host drops its timer and observers.
    pub fn teardown(&mut self) {
        self.active = false;
        self.torn_down = true;
        self.in_flight = None;
        self.scheduler.stop();
        self.gate.disarm();
    }
}
