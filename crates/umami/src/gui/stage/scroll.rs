use gtk::prelude::*;
use gtk4 as gtk;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use turntable::geometry::lerp;
use turntable::{Easing, ScrollController, SectionId};

/// An eased run of the vertical scroll offset from one value to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    from: f64,
    to: f64,
    duration: Duration,
    easing: Easing,
    started: Option<Duration>,
}

impl Glide {
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            started: None,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Offset at `now`, and whether the glide is over.
    pub fn sample(&mut self, now: Duration) -> (f64, bool) {
        let started = *self.started.get_or_insert(now);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            now.saturating_sub(started).as_secs_f64() / self.duration.as_secs_f64()
        };
        if t >= 1.0 {
            (self.to, true)
        } else {
            (lerp(self.from, self.to, self.easing.apply(t)), false)
        }
    }
}

/// Drives the page's scrolled window. Sections are looked up by id and
/// measured against the page widget at scroll time.
pub struct PageScroller {
    window: gtk::ScrolledWindow,
    page: gtk::Widget,
    sections: HashMap<SectionId, gtk::Widget>,
    locked: Rc<Cell<bool>>,
    glide: Option<Glide>,
}

impl PageScroller {
    pub fn new(window: gtk::ScrolledWindow, page: gtk::Widget) -> Self {
        Self {
            window,
            page,
            sections: HashMap::new(),
            locked: Rc::new(Cell::new(false)),
            glide: None,
        }
    }

    pub fn add_section(&mut self, id: SectionId, widget: &impl IsA<gtk::Widget>) {
        self.sections.insert(id, widget.clone().upcast());
    }

    /// Shared with the scroll event controller that swallows wheel input.
    pub fn lock_flag(&self) -> Rc<Cell<bool>> {
        self.locked.clone()
    }

    pub fn is_idle(&self) -> bool {
        self.glide.is_none()
    }

    /// Steps a running glide. Returns whether one is still in progress.
    pub fn advance(&mut self, now: Duration) -> bool {
        let Some(glide) = self.glide.as_mut() else {
            return false;
        };
        let (value, done) = glide.sample(now);
        self.window.vadjustment().set_value(value);
        if done {
            self.glide = None;
        }
        !done
    }

    fn section_top(&self, id: &SectionId) -> Option<f64> {
        let widget = self.sections.get(id)?;
        widget
            .compute_point(&self.page, &gtk::graphene::Point::new(0.0, 0.0))
            .map(|p| p.y() as f64)
    }
}

impl ScrollController for PageScroller {
    fn smooth_scroll_to(
        &mut self,
        section: &SectionId,
        offset: f64,
        duration: Duration,
        easing: Easing,
    ) {
        let Some(top) = self.section_top(section) else {
            log::warn!("Cannot scroll to unknown section '{}'", section);
            return;
        };
        let adjustment = self.window.vadjustment();
        let max = (adjustment.upper() - adjustment.page_size()).max(adjustment.lower());
        let target = (top + offset).clamp(adjustment.lower(), max);
        self.glide = Some(Glide::new(adjustment.value(), target, duration, easing));
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked.set(locked);
        self.window.set_vscrollbar_policy(if locked {
            gtk::PolicyType::External
        } else {
            gtk::PolicyType::Automatic
        });
    }
}
