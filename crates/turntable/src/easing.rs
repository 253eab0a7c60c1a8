//! Easing curves, addressed by the names page authors already use
//! (`"power2.inOut"` and friends).

use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Easing {
    #[strum(to_string = "linear", serialize = "none")]
    Linear,
    #[strum(serialize = "power1.inOut")]
    Power1InOut,
    #[default]
    #[strum(serialize = "power2.inOut")]
    Power2InOut,
    #[strum(serialize = "power2.out")]
    Power2Out,
    /// `min(1, 1.001 - 2^(-5t))`, the clone's flight into the about section.
    #[strum(serialize = "decay.gentle")]
    DecayGentle,
    /// `min(1, 1.001 - 2^(-12t))`, the viewport scroll during the handoff.
    #[strum(serialize = "decay.steep")]
    DecaySteep,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1InOut => power_in_out(t, 2),
            Self::Power2InOut => power_in_out(t, 3),
            Self::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::DecayGentle => decay(t, 5.0),
            Self::DecaySteep => decay(t, 12.0),
        }
    }
}

impl serde::Serialize for Easing {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn power_in_out(t: f64, exponent: i32) -> f64 {
    if t < 0.5 {
        (2.0 * t).powi(exponent) / 2.0
    } else {
        1.0 - (2.0 * (1.0 - t)).powi(exponent) / 2.0
    }
}

fn decay(t: f64, rate: f64) -> f64 {
    if t >= 1.0 {
        return 1.0;
    }
    (1.001 - 2f64.powf(-rate * t)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn curves_start_at_zero_and_end_at_one() {
        for easing in Easing::iter() {
            assert!(easing.apply(0.0).abs() < 0.01, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < f64::EPSILON, "{easing} at 1");
        }
    }

    #[test]
    fn in_out_curves_are_symmetric_at_midpoint() {
        assert!((Easing::Power1InOut.apply(0.5) - 0.5).abs() < 1e-9);
        assert!((Easing::Power2InOut.apply(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn steep_decay_outruns_gentle_decay() {
        for t in [0.05, 0.1, 0.25, 0.5] {
            assert!(Easing::DecaySteep.apply(t) > Easing::DecayGentle.apply(t));
        }
    }

    #[test]
    fn easing_names_deserialize() {
        let cases = vec![
            ("\"power2.inOut\"", Easing::Power2InOut),
            ("\"POWER2.INOUT\"", Easing::Power2InOut),
            ("\"power1.inOut\"", Easing::Power1InOut),
            ("\"power2.out\"", Easing::Power2Out),
            ("\"none\"", Easing::Linear),
            ("\"decay.steep\"", Easing::DecaySteep),
        ];

        for (json, expected) in cases {
            let deserialized: Easing = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert_eq!(
            serde_json::to_string(&Easing::DecayGentle).unwrap(),
            "\"decay.gentle\""
        );
    }
}
