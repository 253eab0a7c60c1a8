//! Time-based property tweens over the [`Scene`], stepped by the widget's
//! frame clock.

use super::model::Scene;
use std::time::Duration;
use turntable::geometry::lerp;
use turntable::{Animator, Props, SettleToken, Target, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Animated,
    /// Animations are disabled system-wide: every change lands at once.
    Static,
}

#[derive(Debug)]
struct Running {
    target: Target,
    from: Props,
    to: Props,
    tween: Tween,
    /// Set on the first frame after the tween was queued.
    started: Option<Duration>,
}

impl Running {
    fn is_spent(&self) -> bool {
        self.to.is_empty() && self.tween.then.is_none() && self.tween.notify.is_none()
    }

    /// `None` while the tween still waits out its delay.
    fn progress(&mut self, now: Duration) -> Option<f64> {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_sub(started).checked_sub(self.tween.delay)?;
        if self.tween.duration.is_zero() {
            return Some(1.0);
        }
        Some(elapsed.as_secs_f64() / self.tween.duration.as_secs_f64())
    }

    fn sample(&self, eased: f64) -> Props {
        let mix = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (Some(a), Some(b)) => Some(lerp(a, b, eased)),
            (_, b) => b,
        };
        Props {
            position: match (self.from.position, self.to.position) {
                (Some(a), Some(b)) => Some(a.lerp(b, eased)),
                (_, b) => b,
            },
            scale: mix(self.from.scale, self.to.scale),
            rotation: mix(self.from.rotation, self.to.rotation),
            opacity: mix(self.from.opacity, self.to.opacity),
            displayed: None,
        }
    }
}

/// Owns the scene and everything currently moving on it.
#[derive(Debug, Default)]
pub struct Stage {
    pub scene: Scene,
    playback: Playback,
    running: Vec<Running>,
    settled: Vec<SettleToken>,
}

impl Stage {
    pub fn new(playback: Playback) -> Self {
        Self {
            playback,
            ..Self::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Tokens of tweens that finished since the last call, in finishing order.
    pub fn take_settled(&mut self) -> Vec<SettleToken> {
        std::mem::take(&mut self.settled)
    }

    /// Steps every running tween to `now`. Returns whether the scene changed.
    pub fn advance(&mut self, now: Duration) -> bool {
        if self.running.is_empty() {
            return false;
        }
        let mut finished = Vec::new();
        for (index, running) in self.running.iter_mut().enumerate() {
            let Some(t) = running.progress(now) else {
                continue;
            };
            if t >= 1.0 {
                finished.push(index);
            } else {
                let props = running.sample(running.tween.easing.apply(t));
                self.scene.apply(running.target, &props);
            }
        }
        for index in finished.into_iter().rev() {
            let done = self.running.remove(index);
            self.finish(done);
        }
        true
    }

    fn finish(&mut self, done: Running) {
        self.scene.apply(done.target, &done.to);
        if let Some(then) = &done.tween.then {
            self.scene.apply(done.target, then);
        }
        if let Some(token) = done.tween.notify {
            self.settled.push(token);
        }
    }

    /// A newer write owns the properties it sets.
    fn release(&mut self, target: Target, props: &Props) {
        for running in self.running.iter_mut().filter(|r| r.target == target) {
            running.to = running.to.without(props);
            running.from = running.from.without(props);
            running.tween.then = running
                .tween
                .then
                .map(|then| then.without(props))
                .filter(|then| !then.is_empty());
        }
        self.running.retain(|r| !r.is_spent());
    }
}

impl Animator for Stage {
    fn animate(&mut self, target: Target, to: Props, tween: Tween) {
        self.release(target, &to);
        if let Some(then) = &tween.then {
            self.release(target, then);
        }

        let running = Running {
            target,
            from: self.scene.get(target),
            to,
            tween,
            started: None,
        };
        match self.playback {
            Playback::Static => self.finish(running),
            Playback::Animated => {
                if to.displayed == Some(true) {
                    self.scene
                        .apply(target, &Props::default().displayed(true));
                }
                self.running.push(running);
            }
        }
    }

    fn set(&mut self, target: Target, props: Props) {
        self.release(target, &props);
        self.scene.apply(target, &props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turntable::{Easing, ItemId, Point};

    const BOWL: Target = Target::Item(ItemId::new(0));

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn linear(millis: u64) -> Tween {
        Tween::new(ms(millis), Easing::Linear)
    }

    #[test]
    fn tween_interpolates_and_reports_once() {
        let mut stage = Stage::default();
        stage.set(BOWL, Props::default().position(Point::new(0.0, 0.0)).scale(1.0));
        stage.animate(
            BOWL,
            Props::default().position(Point::new(100.0, 50.0)).scale(2.0),
            linear(1000).notify(SettleToken(7)),
        );

        stage.advance(ms(2000));
        stage.advance(ms(2500));
        let bowl = stage.scene.bowl(ItemId::new(0));
        assert_eq!(bowl.position, Point::new(50.0, 25.0));
        assert_eq!(bowl.scale, 1.5);
        assert!(stage.take_settled().is_empty());

        stage.advance(ms(3100));
        assert_eq!(stage.scene.bowl(ItemId::new(0)).position, Point::new(100.0, 50.0));
        assert_eq!(stage.take_settled(), vec![SettleToken(7)]);
        assert!(stage.is_idle());
        assert!(!stage.advance(ms(4000)));
    }

    #[test]
    fn reveal_shows_at_start_and_hide_waits_for_the_end() {
        let mut stage = Stage::default();
        stage.animate(BOWL, Props::default().opacity(1.0).displayed(true), linear(100));
        assert!(stage.scene.bowl(ItemId::new(0)).displayed);
        stage.advance(ms(0));
        stage.advance(ms(100));

        stage.animate(
            BOWL,
            Props::default().opacity(0.0),
            linear(100).then(Props::default().displayed(false)),
        );
        stage.advance(ms(200));
        stage.advance(ms(250));
        assert!(stage.scene.bowl(ItemId::new(0)).displayed);
        stage.advance(ms(300));
        assert!(!stage.scene.bowl(ItemId::new(0)).displayed);
    }

    #[test]
    fn newer_tween_takes_over_shared_properties() {
        let mut stage = Stage::default();
        stage.set(BOWL, Props::default().scale(1.0).rotation(0.0));
        stage.animate(
            BOWL,
            Props::default().scale(3.0).rotation(90.0),
            linear(1000).notify(SettleToken(1)),
        );
        stage.animate(BOWL, Props::default().scale(0.5), linear(10));

        stage.advance(ms(0));
        stage.advance(ms(10));
        stage.advance(ms(500));
        let bowl = stage.scene.bowl(ItemId::new(0));
        assert_eq!(bowl.scale, 0.5);
        assert_eq!(bowl.rotation, 45.0);

        stage.advance(ms(1000));
        assert_eq!(stage.take_settled(), vec![SettleToken(1)]);
    }

    #[test]
    fn fully_overridden_tween_still_reports() {
        let mut stage = Stage::default();
        stage.animate(BOWL, Props::default().scale(3.0), linear(1000).notify(SettleToken(2)));
        stage.set(BOWL, Props::default().scale(1.0));
        assert!(!stage.is_idle());
        stage.advance(ms(0));
        stage.advance(ms(1000));
        assert_eq!(stage.take_settled(), vec![SettleToken(2)]);
        assert_eq!(stage.scene.bowl(ItemId::new(0)).scale, 1.0);
    }

    #[test]
    fn delayed_tween_holds_until_its_delay_passes() {
        let mut stage = Stage::default();
        let heading = Target::FeatureHeading(0);
        stage.set(heading, Props::default().position(Point::new(0.0, 50.0)).opacity(0.0));
        stage.animate(
            heading,
            Props::default().position(Point::new(0.0, 0.0)).opacity(1.0),
            linear(800).delay(ms(200)),
        );

        stage.advance(ms(0));
        stage.advance(ms(150));
        assert_eq!(stage.scene.feature(0).heading.opacity, 0.0);
        stage.advance(ms(600));
        assert_eq!(stage.scene.feature(0).heading.opacity, 0.5);
        assert_eq!(stage.scene.feature(0).heading.lift, 25.0);
        stage.advance(ms(1000));
        assert!(stage.is_idle());
        assert_eq!(stage.scene.feature(0).heading.opacity, 1.0);
    }

    #[test]
    fn static_playback_lands_immediately() {
        let mut stage = Stage::new(Playback::Static);
        stage.animate(
            Target::Tray,
            Props::default().rotation(150.0),
            linear(1000).notify(SettleToken(3)),
        );
        assert!(stage.is_idle());
        assert_eq!(stage.scene.tray_rotation, 150.0);
        assert_eq!(stage.take_settled(), vec![SettleToken(3)]);
    }
}
