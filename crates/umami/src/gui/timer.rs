use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// At most one pending one-shot source on the thread-default main context.
#[derive(Default)]
pub struct TimerSlot {
    source: Rc<RefCell<Option<glib::SourceId>>>,
    deadline: Option<Duration>,
}

impl TimerSlot {
    /// Schedules `on_fire` for `deadline`, replacing any other pending
    /// deadline. Re-arming for the deadline already pending is a no-op.
    pub fn arm<F>(&mut self, deadline: Duration, now: Duration, on_fire: F)
    where
        F: Fn() + 'static,
    {
        if self.deadline == Some(deadline) && self.source.borrow().is_some() {
            return;
        }
        self.cancel();

        // the source clears its own slot so it is never removed after firing
        let slot = self.source.clone();
        let delay = deadline.saturating_sub(now) + Duration::from_millis(1);
        let id = glib::timeout_add_local_once(delay, move || {
            slot.borrow_mut().take();
            on_fire();
        });
        *self.source.borrow_mut() = Some(id);
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.source.borrow_mut().take() {
            id.remove();
        }
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Instant;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    /// Runs `f` on a private main context, then dispatches it for `window`.
    fn with_context(window: Duration, f: impl FnOnce()) {
        let ctx = glib::MainContext::new();
        ctx.with_thread_default(|| {
            f();
            let start = Instant::now();
            while start.elapsed() < window {
                while ctx.iteration(false) {}
                std::thread::sleep(Duration::from_millis(2));
            }
        })
        .unwrap();
    }

    #[test]
    fn arming_twice_keeps_one_source() {
        let (fired, on_fire) = counter();
        let (second, on_second) = counter();
        let mut slot = TimerSlot::default();
        with_context(Duration::from_millis(120), || {
            slot.arm(Duration::from_millis(20), Duration::ZERO, on_fire);
            slot.arm(Duration::from_millis(20), Duration::from_millis(5), on_second);
        });
        assert_eq!(fired.get(), 1);
        assert_eq!(second.get(), 0);
        assert!(slot.source.borrow().is_none());
    }

    #[test]
    fn rearming_for_a_new_deadline_drops_the_old_one() {
        let (old, on_old) = counter();
        let (new, on_new) = counter();
        let mut slot = TimerSlot::default();
        with_context(Duration::from_millis(150), || {
            slot.arm(Duration::from_millis(20), Duration::ZERO, on_old);
            slot.arm(Duration::from_millis(40), Duration::ZERO, on_new);
        });
        assert_eq!(old.get(), 0);
        assert_eq!(new.get(), 1);
    }

    #[test]
    fn cancel_before_the_deadline_fires_nothing() {
        let (fired, on_fire) = counter();
        let mut slot = TimerSlot::default();
        with_context(Duration::from_millis(100), || {
            slot.arm(Duration::from_millis(20), Duration::ZERO, on_fire);
            slot.cancel();
        });
        assert_eq!(fired.get(), 0);
        assert_eq!(slot.deadline, None);
    }

    #[test]
    fn slot_can_be_armed_again_after_firing() {
        let (fired, on_fire) = counter();
        let mut slot = TimerSlot::default();
        let on_fire = Rc::new(on_fire);
        with_context(Duration::from_millis(120), || {
            let f = on_fire.clone();
            slot.arm(Duration::from_millis(10), Duration::ZERO, move || f());
        });
        with_context(Duration::from_millis(120), || {
            let f = on_fire.clone();
            slot.arm(Duration::from_millis(10), Duration::ZERO, move || f());
        });
        assert_eq!(fired.get(), 2);
    }
}
