use std::time::Duration;

/// Timestamps are `Duration`s since the session started, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdvanceState {
    Running { next_due: Duration },
    Paused { resume_at: Duration },
    Stopped,
}

/// Periodic auto-advance with a cool-down after manual input.
///
/// The scheduler never owns a timer. The host arms exactly one wake-up at
/// [`AutoAdvance::next_deadline`], cancelling any previous one first, and
/// calls [`AutoAdvance::poll`] when it fires.
#[derive(Debug, Clone)]
pub struct AutoAdvance {
    state: AdvanceState,
    interval: Duration,
    cooldown: Duration,
}

impl AutoAdvance {
    /// Created paused at zero so the first `start` arms a fresh period.
    pub fn new(interval: Duration, cooldown: Duration) -> Self {
        Self {
            state: AdvanceState::Paused {
                resume_at: Duration::MAX,
            },
            interval,
            cooldown,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.state == AdvanceState::Stopped
    }

    /// No-op while running (no second timer) or once stopped.
    pub fn start(&mut self, now: Duration) {
        if let AdvanceState::Paused { .. } = self.state {
            self.state = AdvanceState::Running {
                next_due: now + self.interval,
            };
        }
    }

    /// Manual input: hold off for the cool-down, counted from the latest input.
    pub fn pause_for_manual(&mut self, now: Duration) {
        if self.is_stopped() {
            return;
        }
        self.state = AdvanceState::Paused {
            resume_at: now + self.cooldown,
        };
    }

    pub fn stop(&mut self) {
        self.state = AdvanceState::Stopped;
    }

    /// Reports whether an advance is due. At most one per call; periods the
    /// host slept through are dropped rather than replayed.
    pub fn poll(&mut self, now: Duration) -> bool {
        if let AdvanceState::Paused { resume_at } = self.state
            && now >= resume_at
        {
            self.state = AdvanceState::Running {
                next_due: resume_at + self.interval,
            };
        }

        match self.state {
            AdvanceState::Running { next_due } if now >= next_due => {
                let mut next = next_due + self.interval;
                while next <= now {
                    next += self.interval;
                }
                self.state = AdvanceState::Running { next_due: next };
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        match self.state {
            AdvanceState::Running { next_due } => Some(next_due),
            AdvanceState::Paused { resume_at } if resume_at != Duration::MAX => Some(resume_at),
            _ => None,
        }
    }

    /// New constants apply from the next armed period.
    pub fn retune(&mut self, interval: Duration, cooldown: Duration) {
        self.interval = interval;
        self.cooldown = cooldown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scheduler() -> AutoAdvance {
        AutoAdvance::new(ms(5000), ms(3000))
    }

    /// Polls every 10ms over `[from, to]` and counts advances.
    fn advances_between(s: &mut AutoAdvance, from: u64, to: u64) -> usize {
        (from..=to).step_by(10).filter(|&t| s.poll(ms(t))).count()
    }

    #[test]
    fn running_advances_every_interval() {
        let mut s = scheduler();
        s.start(ms(0));
        assert_eq!(advances_between(&mut s, 0, 4990), 0);
        assert_eq!(advances_between(&mut s, 5000, 5000), 1);
        assert_eq!(advances_between(&mut s, 5010, 15000), 2);
    }

    #[test]
    fn start_while_running_keeps_a_single_period() {
        let mut s = scheduler();
        s.start(ms(0));
        s.start(ms(2000));
        s.start(ms(4000));
        assert_eq!(s.next_deadline(), Some(ms(5000)));
        assert_eq!(advances_between(&mut s, 0, 9990), 1);
    }

    #[test]
    fn manual_input_holds_off_then_resumes_once() {
        let mut s = scheduler();
        s.start(ms(0));
        s.pause_for_manual(ms(1000));

        assert_eq!(advances_between(&mut s, 1000, 3990), 0);
        assert_eq!(s.next_deadline(), Some(ms(4000)));
        // cool-down over, but the first auto advance waits a full interval
        assert_eq!(advances_between(&mut s, 4000, 8990), 0);
        assert_eq!(advances_between(&mut s, 9000, 9000), 1);
        assert_eq!(advances_between(&mut s, 9010, 13990), 0);
    }

    #[test]
    fn exactly_one_advance_after_cooldown_plus_interval() {
        let mut s = scheduler();
        s.start(ms(0));
        s.pause_for_manual(ms(0));
        assert_eq!(advances_between(&mut s, 0, 2990), 0);
        assert_eq!(advances_between(&mut s, 3000, 8000), 1);
    }

    #[test]
    fn repeated_manual_input_extends_the_cooldown() {
        let mut s = scheduler();
        s.start(ms(0));
        s.pause_for_manual(ms(0));
        s.pause_for_manual(ms(2000));
        s.pause_for_manual(ms(2500));
        assert_eq!(s.next_deadline(), Some(ms(5500)));
        assert_eq!(advances_between(&mut s, 0, 10490), 0);
        assert_eq!(advances_between(&mut s, 10500, 15490), 1);
    }

    #[test]
    fn late_poll_reports_one_advance_and_skips_missed_periods() {
        let mut s = scheduler();
        s.start(ms(0));
        assert!(s.poll(ms(17000)));
        assert!(!s.poll(ms(17000)));
        assert_eq!(s.next_deadline(), Some(ms(20000)));
    }

    #[test]
    fn stopped_is_terminal() {
        let mut s = scheduler();
        s.start(ms(0));
        s.stop();
        s.start(ms(10));
        s.pause_for_manual(ms(20));
        assert!(s.is_stopped());
        assert_eq!(s.next_deadline(), None);
        assert_eq!(advances_between(&mut s, 0, 30000), 0);
    }

    #[test]
    fn unstarted_scheduler_has_no_deadline() {
        let mut s = scheduler();
        assert_eq!(s.next_deadline(), None);
        assert!(!s.poll(ms(60000)));
    }
}
