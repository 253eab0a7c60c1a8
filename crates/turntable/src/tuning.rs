use crate::easing::Easing;
use crate::geometry::SectionId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    #[error(
        "auto-advance interval ({interval_ms}ms) must exceed motion ({motion_ms}ms) plus focus ({focus_ms}ms)"
    )]
    OverlappingRotations {
        interval_ms: u64,
        motion_ms: u64,
        focus_ms: u64,
    },
    #[error("gate threshold {0} is outside (0, 1)")]
    GateThreshold(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub auto_advance_ms: u64,
    pub cooldown_ms: u64,
    pub motion_ms: u64,
    pub focus_ms: u64,
    pub tray_turn_ms: u64,
    pub tray_step_deg: f64,
    pub motion_easing: Easing,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            auto_advance_ms: 5000,
            cooldown_ms: 3000,
            motion_ms: 1200,
            focus_ms: 500,
            tray_turn_ms: 1000,
            tray_step_deg: 60.0,
            motion_easing: Easing::Power2InOut,
        }
    }
}

impl Timing {
    pub fn auto_advance(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn motion(&self) -> Duration {
        Duration::from_millis(self.motion_ms)
    }

    pub fn focus(&self) -> Duration {
        Duration::from_millis(self.focus_ms)
    }

    pub fn tray_turn(&self) -> Duration {
        Duration::from_millis(self.tray_turn_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateTuning {
    pub threshold: f64,
}

impl Default for GateTuning {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffTuning {
    pub target_section: SectionId,
    pub offset_x: f64,
    /// Vertical offset as a fraction of the viewport height.
    pub offset_y_viewport: f64,
    pub final_scale: f64,
    pub flight_ms: u64,
    pub flight_easing: Easing,
    pub scroll_ms: u64,
    pub scroll_easing: Easing,
}

impl Default for HandoffTuning {
    fn default() -> Self {
        Self {
            target_section: SectionId::new("about"),
            offset_x: -350.0,
            offset_y_viewport: -0.25,
            final_scale: 0.8,
            flight_ms: 3000,
            flight_easing: Easing::DecayGentle,
            scroll_ms: 2000,
            scroll_easing: Easing::DecaySteep,
        }
    }
}

/// Every retunable constant of the carousel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub timing: Timing,
    pub gate: GateTuning,
    pub handoff: HandoffTuning,
}

impl Tuning {
    /// Rotations must settle and refocus before the next auto-advance fires.
    pub fn validate(&self) -> Result<(), TuningError> {
        let t = &self.timing;
        if t.auto_advance_ms <= t.motion_ms + t.focus_ms {
            return Err(TuningError::OverlappingRotations {
                interval_ms: t.auto_advance_ms,
                motion_ms: t.motion_ms,
                focus_ms: t.focus_ms,
            });
        }
        let threshold = self.gate.threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(TuningError::GateThreshold(threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn interval_must_cover_settle_and_focus() {
        let mut tuning = Tuning::default();
        tuning.timing.auto_advance_ms = 1700;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::OverlappingRotations { interval_ms: 1700, .. })
        ));
        tuning.timing.auto_advance_ms = 1701;
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let tuning: Tuning =
            serde_json::from_str(r#"{"timing": {"cooldown_ms": 4000}, "gate": {}}"#).unwrap();
        assert_eq!(tuning.timing.cooldown_ms, 4000);
        assert_eq!(tuning.timing.auto_advance_ms, 5000);
        assert_eq!(tuning.gate.threshold, 0.1);
        assert_eq!(tuning.handoff.target_section.as_str(), "about");
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.gate.threshold = 1.5;
        assert_eq!(tuning.validate(), Err(TuningError::GateThreshold(1.5)));
    }
}
