//! Scroll-driven entrances for the feature sections below the landing
//! section. Copy rises into place once its top crosses a line in the
//! viewport and sinks back when scrolled below that line again; backdrops
//! drift with the section's scroll progress.

use crate::easing::Easing;
use crate::stage::{Cue, Target};
use std::time::Duration;

pub const TEXT_LIFT: f64 = 100.0;
pub const HEADING_LIFT: f64 = 50.0;
/// Backdrop vertical position, in percent, before the section scrolls in.
pub const BACKDROP_REST: f64 = 50.0;
pub const BACKDROP_TRAVEL: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPart {
    Heading,
    Text,
}

impl RevealPart {
    /// Trigger line as a fraction of the viewport height, from the top.
    pub fn line(self) -> f64 {
        match self {
            Self::Heading => 0.85,
            Self::Text => 0.8,
        }
    }

    pub fn lift(self) -> f64 {
        match self {
            Self::Heading => HEADING_LIFT,
            Self::Text => TEXT_LIFT,
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            Self::Heading => Duration::from_millis(800),
            Self::Text => Duration::from_millis(1000),
        }
    }

    pub fn delay(self) -> Duration {
        match self {
            Self::Heading => Duration::from_millis(200),
            Self::Text => Duration::ZERO,
        }
    }

    fn target(self, section: usize) -> Target {
        match self {
            Self::Heading => Target::FeatureHeading(section),
            Self::Text => Target::FeatureText(section),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    Play,
    Reverse,
}

/// Two-state toggle over a part's position in the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTrigger {
    line: f64,
    revealed: bool,
}

impl RevealTrigger {
    pub fn new(line: f64) -> Self {
        Self {
            line,
            revealed: false,
        }
    }

    /// `top` is the part's top edge as a fraction of the viewport height.
    pub fn observe(&mut self, top: f64) -> Option<RevealAction> {
        match (self.revealed, top <= self.line) {
            (false, true) => {
                self.revealed = true;
                Some(RevealAction::Play)
            }
            (true, false) => {
                self.revealed = false;
                Some(RevealAction::Reverse)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealPlan {
    pub target: Target,
    /// Downward offset from the resting position.
    pub lift: f64,
    pub opacity: f64,
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl RevealPlan {
    fn hidden(part: RevealPart, section: usize) -> Self {
        Self {
            target: part.target(section),
            lift: part.lift(),
            opacity: 0.0,
            duration: Duration::ZERO,
            delay: Duration::ZERO,
            easing: Easing::Power2Out,
        }
    }

    fn for_action(part: RevealPart, section: usize, action: RevealAction) -> Self {
        match action {
            RevealAction::Play => Self {
                lift: 0.0,
                opacity: 1.0,
                duration: part.duration(),
                delay: part.delay(),
                ..Self::hidden(part, section)
            },
            // reversing skips the entrance delay
            RevealAction::Reverse => Self {
                duration: part.duration(),
                ..Self::hidden(part, section)
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxPlan {
    pub target: Target,
    pub background_y: f64,
}

/// One measured feature section. `top` is relative to the viewport's top
/// edge; the part offsets are relative to the section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionMetrics {
    pub top: f64,
    pub height: f64,
    pub heading_top: f64,
    pub text_top: f64,
}

/// 0 while the section's top is at the viewport bottom, 1 once its bottom
/// has left through the viewport top.
pub fn parallax_progress(metrics: &SectionMetrics, viewport_height: f64) -> f64 {
    let span = metrics.height + viewport_height;
    if span <= 0.0 {
        return 0.0;
    }
    ((viewport_height - metrics.top) / span).clamp(0.0, 1.0)
}

pub fn backdrop_position(progress: f64) -> f64 {
    BACKDROP_REST + progress * BACKDROP_TRAVEL
}

#[derive(Debug, Clone, Copy)]
struct Section {
    heading: RevealTrigger,
    text: RevealTrigger,
    backdrop: Option<f64>,
}

impl Section {
    fn new() -> Self {
        Self {
            heading: RevealTrigger::new(RevealPart::Heading.line()),
            text: RevealTrigger::new(RevealPart::Text.line()),
            backdrop: None,
        }
    }
}

/// Reveal and parallax state for every feature section on the page.
#[derive(Debug)]
pub struct FeatureReveal {
    sections: Vec<Section>,
}

impl FeatureReveal {
    pub fn new(count: usize) -> Self {
        Self {
            sections: vec![Section::new(); count],
        }
    }

    /// Parks every heading and body copy in its hidden state at once.
    pub fn start(&self) -> Vec<Cue> {
        let plans = (0..self.sections.len())
            .flat_map(|index| {
                [RevealPart::Heading, RevealPart::Text]
                    .map(|part| RevealPlan::hidden(part, index))
            })
            .collect();
        vec![Cue::Reveal(plans)]
    }

    /// Sections beyond `metrics` are left alone.
    pub fn observe(&mut self, metrics: &[SectionMetrics], viewport_height: f64) -> Vec<Cue> {
        if viewport_height <= 0.0 {
            return Vec::new();
        }

        let mut reveals = Vec::new();
        let mut parallax = Vec::new();
        for (index, (section, m)) in self.sections.iter_mut().zip(metrics).enumerate() {
            let parts = [
                (RevealPart::Heading, m.heading_top, &mut section.heading),
                (RevealPart::Text, m.text_top, &mut section.text),
            ];
            for (part, offset, trigger) in parts {
                if let Some(action) = trigger.observe((m.top + offset) / viewport_height) {
                    reveals.push(RevealPlan::for_action(part, index, action));
                }
            }

            let y = backdrop_position(parallax_progress(m, viewport_height));
            if section.backdrop != Some(y) {
                section.backdrop = Some(y);
                parallax.push(ParallaxPlan {
                    target: Target::FeatureBackdrop(index),
                    background_y: y,
                });
            }
        }

        let mut cues = Vec::new();
        if !reveals.is_empty() {
            cues.push(Cue::Reveal(reveals));
        }
        if !parallax.is_empty() {
            cues.push(Cue::Parallax(parallax));
        }
        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::stage::Props;
    use crate::stage::testing::{Call, replay};

    const VIEWPORT: f64 = 1000.0;

    fn section_at(top: f64) -> SectionMetrics {
        SectionMetrics {
            top,
            height: 800.0,
            heading_top: 200.0,
            text_top: 300.0,
        }
    }

    fn reveals(cues: &[Cue]) -> Vec<RevealPlan> {
        cues.iter()
            .filter_map(|c| match c {
                Cue::Reveal(plans) => Some(plans.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn trigger_plays_at_the_line_and_reverses_below_it() {
        let mut trigger = RevealTrigger::new(0.8);
        assert_eq!(trigger.observe(0.95), None);
        assert_eq!(trigger.observe(0.8), Some(RevealAction::Play));
        assert_eq!(trigger.observe(0.3), None);
        assert_eq!(trigger.observe(0.81), Some(RevealAction::Reverse));
        assert_eq!(trigger.observe(0.9), None);
        assert_eq!(trigger.observe(0.7), Some(RevealAction::Play));
    }

    #[test]
    fn start_hides_every_part_without_animating() {
        let features = FeatureReveal::new(2);
        let calls = replay(&features.start());
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[1],
            Call::Set(
                Target::FeatureText(0),
                Props::default().position(Point::new(0.0, 100.0)).opacity(0.0)
            )
        );
        assert!(calls.iter().all(|c| matches!(c, Call::Set(..))));
    }

    #[test]
    fn heading_crosses_its_line_before_the_body() {
        let mut features = FeatureReveal::new(1);
        assert!(reveals(&features.observe(&[section_at(1200.0)], VIEWPORT)).is_empty());

        // heading at 0.84, body at 0.94
        let plans = reveals(&features.observe(&[section_at(640.0)], VIEWPORT));
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].target, Target::FeatureHeading(0));
        assert_eq!(plans[0].delay, Duration::from_millis(200));
        assert_eq!(plans[0].duration, Duration::from_millis(800));

        // body at 0.8
        let plans = reveals(&features.observe(&[section_at(500.0)], VIEWPORT));
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].target, Target::FeatureText(0));
        assert_eq!((plans[0].lift, plans[0].opacity), (0.0, 1.0));
        assert_eq!(plans[0].duration, Duration::from_millis(1000));
    }

    #[test]
    fn scrolling_back_reverses_without_delay() {
        let mut features = FeatureReveal::new(1);
        features.observe(&[section_at(0.0)], VIEWPORT);
        assert!(reveals(&features.observe(&[section_at(-400.0)], VIEWPORT)).is_empty());

        let plans = reveals(&features.observe(&[section_at(900.0)], VIEWPORT));
        assert_eq!(plans.len(), 2);
        for plan in plans {
            assert_eq!(plan.opacity, 0.0);
            assert_eq!(plan.delay, Duration::ZERO);
            assert!(!plan.duration.is_zero());
        }

        let calls = replay(&features.observe(&[section_at(0.0)], VIEWPORT));
        assert!(calls.iter().any(|c| matches!(
            c,
            Call::Animate(Target::FeatureHeading(0), _, tween)
                if tween.delay == Duration::from_millis(200)
        )));
    }

    #[test]
    fn parallax_follows_section_progress() {
        assert_eq!(parallax_progress(&section_at(VIEWPORT), VIEWPORT), 0.0);
        assert_eq!(parallax_progress(&section_at(2000.0), VIEWPORT), 0.0);
        assert_eq!(parallax_progress(&section_at(100.0), VIEWPORT), 0.5);
        assert_eq!(parallax_progress(&section_at(-800.0), VIEWPORT), 1.0);
        assert_eq!(backdrop_position(0.5), 65.0);
    }

    #[test]
    fn backdrop_is_set_only_when_it_moves() {
        let mut features = FeatureReveal::new(1);
        let cues = features.observe(&[section_at(100.0)], VIEWPORT);
        assert!(cues.contains(&Cue::Parallax(vec![ParallaxPlan {
            target: Target::FeatureBackdrop(0),
            background_y: 65.0,
        }])));
        assert!(features.observe(&[section_at(100.0)], VIEWPORT).is_empty());
    }

    #[test]
    fn unmeasured_sections_and_empty_viewports_are_ignored() {
        let mut features = FeatureReveal::new(3);
        assert!(features.observe(&[section_at(0.0)], 0.0).is_empty());
        let cues = features.observe(&[section_at(0.0)], VIEWPORT);
        assert!(
            reveals(&cues)
                .iter()
                .all(|p| matches!(p.target, Target::FeatureHeading(0) | Target::FeatureText(0)))
        );
    }
}
