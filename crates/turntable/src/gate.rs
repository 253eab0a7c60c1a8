#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

impl ScrollDirection {
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Forward)
        } else if delta < 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }
}

/// Scroll progress through the landing section: 0 when its top meets the
/// viewport top, 1 when its bottom does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub direction: ScrollDirection,
    pub progress: f64,
}

impl ScrollSample {
    pub fn new(direction: ScrollDirection, progress: f64) -> Self {
        Self {
            direction,
            progress,
        }
    }
}

/// One-shot trigger for the handoff.
#[derive(Debug, Clone)]
pub struct TransitionGate {
    threshold: f64,
    armed: bool,
}

impl TransitionGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            armed: true,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// True exactly once: the first forward sample past the threshold.
    pub fn observe(&mut self, sample: ScrollSample) -> bool {
        if !self.armed {
            return false;
        }
        let fire =
            sample.direction == ScrollDirection::Forward && sample.progress > self.threshold;
        if fire {
            self.armed = false;
        }
        fire
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::ScrollDirection::{Backward, Forward};

    #[test]
    fn fires_on_first_forward_sample_past_threshold() {
        let mut gate = TransitionGate::new(0.1);
        assert!(!gate.observe(ScrollSample::new(Forward, 0.05)));
        assert!(!gate.observe(ScrollSample::new(Forward, 0.1)));
        assert!(!gate.observe(ScrollSample::new(Backward, 0.5)));
        assert!(gate.observe(ScrollSample::new(Forward, 0.11)));
        assert!(!gate.is_armed());
    }

    #[test]
    fn fires_at_most_once_while_scroll_oscillates() {
        let mut gate = TransitionGate::new(0.1);
        let fired = (0..40)
            .map(|i| {
                let direction = if i % 2 == 0 { Forward } else { Backward };
                let progress = if i % 4 < 2 { 0.3 } else { 0.02 };
                gate.observe(ScrollSample::new(direction, progress))
            })
            .filter(|&f| f)
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn direction_from_delta() {
        assert_eq!(ScrollDirection::from_delta(3.0), Some(Forward));
        assert_eq!(ScrollDirection::from_delta(-0.5), Some(Backward));
        assert_eq!(ScrollDirection::from_delta(0.0), None);
    }

    #[test]
    fn disarmed_gate_ignores_everything() {
        let mut gate = TransitionGate::new(0.1);
        gate.disarm();
        assert!(!gate.observe(ScrollSample::new(Forward, 0.9)));
    }
}
