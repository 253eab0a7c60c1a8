use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::stage::{self, BowlArt, FEATURE_COUNT, PageScroller, Playback, Stage};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::timer::TimerSlot;
use crate::gui::window;
use crate::sys::launch;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};
use turntable::reveal::FeatureReveal;
use turntable::stage::perform;
use turntable::{
    Animator, CarouselSession, Cue, Easing, ItemId, Props, Rotation, ScrollDirection,
    ScrollSample, SectionId, SettleToken, Target, Tween,
};

/// Reserved for the page dim ahead of opening the recipe browser.
const TRY_NOW_TOKEN: SettleToken = SettleToken(0);
const TRY_NOW_DIM: f64 = 0.8;
const TRY_NOW_FADE: Duration = Duration::from_millis(300);
/// Distance credited per wheel step while the page is locked.
const PULL_STEP: f64 = 40.0;

pub struct AppModel {
    config: Config,
    session: CarouselSession,
    stage: Rc<RefCell<Stage>>,
    arts: Rc<RefCell<Vec<BowlArt>>>,
    scroller: PageScroller,
    epoch: Instant,
    timer: TimerSlot,
    ticker: Option<gtk::TickCallbackId>,
    sender: ComponentSender<AppModel>,
    adjustment: gtk::Adjustment,
    handlers: Vec<glib::SignalHandlerId>,
    last_offset: f64,
    pull: f64,
    dimming: bool,
    scrolled: gtk::ScrolledWindow,
    page: gtk::Box,
    home: gtk::DrawingArea,
    about: gtk::Box,
    bowl_target: gtk::Box,
    clone_layer: gtk::DrawingArea,
    features: Vec<gtk::DrawingArea>,
    reveal: FeatureReveal,
}

#[derive(Debug)]
pub enum AppMsg {
    Rotate(Rotation),
    /// The auto-advance timer fired.
    Tick,
    /// One frame of the home section's frame clock.
    Frame,
    Scrolled(f64),
    /// Wheel input swallowed by the scroll lock.
    Pull(f64),
    Resized,
    TryNow,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn load_arts(config: &Config) -> Vec<BowlArt> {
    ItemId::all()
        .map(|item| BowlArt::from_config(&config.bowl(item)))
        .collect()
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Umami"),
            set_default_size: (1280, 800),
            add_css_class: "umami-window",

            add_controller = gtk::EventControllerKey {
                set_propagation_phase: gtk::PropagationPhase::Capture,
                connect_key_pressed[sender] => move |_, key, _, _| {
                    let rotation = if key == gtk::gdk::Key::Right {
                        Rotation::Forward
                    } else if key == gtk::gdk::Key::Left {
                        Rotation::Backward
                    } else {
                        return glib::Propagation::Proceed;
                    };
                    sender.input(AppMsg::Rotate(rotation));
                    glib::Propagation::Stop
                }
            },

            #[name = "scrolled"]
            gtk::ScrolledWindow {
                set_hscrollbar_policy: gtk::PolicyType::Never,

                #[name = "overlay"]
                gtk::Overlay {
                    #[name = "page"]
                    gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,

                        #[name = "home"]
                        gtk::DrawingArea {
                            set_hexpand: true,
                            add_css_class: "umami-home",
                        },

                        #[name = "about"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_spacing: 24,
                            add_css_class: "umami-about",

                            gtk::Label {
                                set_label: "Ramen, your way",
                                add_css_class: "title-1",
                            },

                            gtk::Label {
                                set_label: "Pick a broth, stack your toppings and let the recipe browser do the rest.",
                                set_wrap: true,
                                set_max_width_chars: 60,
                            },

                            #[name = "bowl_target"]
                            gtk::Box {
                                set_size_request: (240, 240),
                                set_halign: gtk::Align::Center,
                            },

                            gtk::Button {
                                set_label: "Try now",
                                set_halign: gtk::Align::Center,
                                add_css_class: "umami-try-now",
                                connect_clicked => AppMsg::TryNow,
                            },
                        },
                    },
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        if config.kiosk {
            window::init_kiosk(&root);
        }

        let widgets = view_output!();

        let playback = match window::check_animations(&root) {
            Ok(()) => Playback::Animated,
            Err(e) => {
                log::warn!("{}, bowls will jump between slots", e);
                Playback::Static
            }
        };
        let stage = Rc::new(RefCell::new(Stage::new(playback)));
        let arts = Rc::new(RefCell::new(load_arts(&config)));

        let clone_layer = gtk::DrawingArea::new();
        clone_layer.set_can_target(false);
        widgets.overlay.add_overlay(&clone_layer);

        let (stage_draw, arts_draw) = (stage.clone(), arts.clone());
        widgets.home.set_draw_func(move |area, cr, _, _| {
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) =
                stage::draw_home(cr, &stage_draw.borrow().scene, &arts_draw.borrow(), &colors)
            {
                log::error!("Drawing error: {}", e);
            }
        });
        let (stage_draw, arts_draw) = (stage.clone(), arts.clone());
        clone_layer.set_draw_func(move |area, cr, _, _| {
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) =
                stage::draw_clone(cr, &stage_draw.borrow().scene, &arts_draw.borrow(), &colors)
            {
                log::error!("Drawing error: {}", e);
            }
        });

        let features: Vec<gtk::DrawingArea> = (0..FEATURE_COUNT)
            .map(|index| {
                let area = gtk::DrawingArea::new();
                area.set_hexpand(true);
                let stage_draw = stage.clone();
                area.set_draw_func(move |area, cr, width, height| {
                    let colors = ThemeColors::from_context(&area.style_context());
                    let stage = stage_draw.borrow();
                    let (w, h) = (width as f64, height as f64);
                    if let Err(e) = stage::draw_feature(cr, &stage.scene, index, w, h, &colors) {
                        log::error!("Drawing error: {}", e);
                    }
                });
                widgets.page.append(&area);
                area
            })
            .collect();

        let session = match CarouselSession::new(config.tuning()) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid tuning, using defaults: {}", e);
                CarouselSession::default()
            }
        };

        let mut scroller =
            PageScroller::new(widgets.scrolled.clone(), widgets.page.clone().upcast());
        scroller.add_section(SectionId::new("home"), &widgets.home);
        scroller.add_section(SectionId::new("about"), &widgets.about);

        let pull_sender = sender.clone();
        window::install_scroll_lock(&widgets.scrolled, scroller.lock_flag(), move |dy| {
            pull_sender.input(AppMsg::Pull(dy));
        });

        let adjustment = widgets.scrolled.vadjustment();
        let mut handlers = Vec::new();
        let s = sender.clone();
        handlers.push(adjustment.connect_value_changed(move |adj| {
            s.input(AppMsg::Scrolled(adj.value()));
        }));
        let s = sender.clone();
        handlers.push(adjustment.connect_page_size_notify(move |_| {
            s.input(AppMsg::Resized);
        }));
        let s = sender.clone();
        widgets.home.connect_resize(move |_, _, _| s.input(AppMsg::Resized));

        let event_sender = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                event_sender.input(AppMsg::from(event));
            }
        });

        let mut model = AppModel {
            config,
            session,
            stage,
            arts,
            scroller,
            epoch: Instant::now(),
            timer: TimerSlot::default(),
            ticker: None,
            sender,
            adjustment,
            handlers,
            last_offset: 0.0,
            pull: 0.0,
            dimming: false,
            scrolled: widgets.scrolled.clone(),
            page: widgets.page.clone(),
            home: widgets.home.clone(),
            about: widgets.about.clone(),
            bowl_target: widgets.bowl_target.clone(),
            clone_layer,
            features,
            reveal: FeatureReveal::new(FEATURE_COUNT),
        };

        let cues = model.reveal.start();
        model.play(cues);
        let cues = model.session.start(model.clock());
        model.play(cues);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let now = self.clock();
        match msg {
            AppMsg::Rotate(rotation) => {
                let cues = self.session.manual(rotation, now);
                self.play(cues);
            }
            AppMsg::Tick => {
                let cues = self.session.tick(now);
                self.play(cues);
            }
            AppMsg::Frame => {
                self.stage.borrow_mut().advance(now);
                self.scroller.advance(now);
                self.play(Vec::new());
            }
            AppMsg::Scrolled(offset) => {
                let delta = offset - self.last_offset;
                self.last_offset = offset;
                self.observe_scroll(delta, offset);
                self.observe_features();
            }
            AppMsg::Pull(dy) => {
                self.pull = (self.pull + dy * PULL_STEP).max(0.0);
                self.observe_scroll(dy, self.pull);
            }
            AppMsg::Resized => {
                self.measure();
                self.observe_features();
                self.redraw();
            }
            AppMsg::TryNow => self.try_now(),
            AppMsg::ConfigReload => self.reload(),
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.timer.cancel();
        if let Some(id) = self.ticker.take() {
            id.remove();
        }
        for id in self.handlers.drain(..) {
            self.adjustment.disconnect(id);
        }
        self.session.teardown();
        log::debug!("Carousel torn down");
    }
}

impl AppModel {
    fn clock(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Replays cues on the stage, then feeds finished motions back to the
    /// session until nothing else settles.
    fn play(&mut self, cues: Vec<Cue>) {
        let mut queue = VecDeque::from(cues);
        loop {
            while let Some(cue) = queue.pop_front() {
                let mut stage = self.stage.borrow_mut();
                if let Cue::Handoff(plan) = &cue {
                    stage.scene.prepare_clone(plan.original, plan.flight.size);
                }
                perform(&cue, &mut *stage, &mut self.scroller);
            }
            let settled = self.stage.borrow_mut().take_settled();
            if settled.is_empty() {
                break;
            }
            for token in settled {
                queue.extend(self.settle(token));
            }
        }
        self.rearm_timer();
        self.sync_ticker();
        self.redraw();
    }

    fn settle(&mut self, token: SettleToken) -> Vec<Cue> {
        if token != TRY_NOW_TOKEN {
            return self.session.motion_settled(token);
        }
        self.dimming = false;
        if let Err(e) = launch::open_recipes(&self.config.recipes_url) {
            log::error!("Failed to open recipe browser: {}", e);
        }
        self.stage.borrow_mut().animate(
            Target::Page,
            Props::default().opacity(1.0),
            Tween::new(TRY_NOW_FADE, Easing::Power2Out),
        );
        Vec::new()
    }

    fn try_now(&mut self) {
        if self.dimming {
            return;
        }
        self.dimming = true;
        self.stage.borrow_mut().animate(
            Target::Page,
            Props::default().opacity(TRY_NOW_DIM),
            Tween::new(TRY_NOW_FADE, Easing::Power2Out).notify(TRY_NOW_TOKEN),
        );
        self.play(Vec::new());
    }

    fn observe_scroll(&mut self, delta: f64, distance: f64) {
        let Some(direction) = ScrollDirection::from_delta(delta) else {
            return;
        };
        self.measure();
        let height = self.stage.borrow().scene.viewport.height;
        if height <= 0.0 {
            return;
        }
        let sample = ScrollSample::new(direction, (distance / height).clamp(0.0, 1.0));
        let cues = self.session.scroll(sample, &self.stage.borrow().scene);
        self.play(cues);
    }

    fn observe_features(&mut self) {
        let offset = self.adjustment.value();
        let metrics: Vec<_> = self
            .features
            .iter()
            .map_while(|area| window::bounds_in(area, &self.page))
            .map(|b| stage::feature_metrics(b.origin.y - offset, b.size.height))
            .collect();
        let height = self.stage.borrow().scene.viewport.height;
        let cues = self.reveal.observe(&metrics, height);
        if !cues.is_empty() {
            self.play(cues);
        }
    }

    /// Keeps the home section one viewport tall and refreshes what the
    /// handoff reads off the page.
    fn measure(&mut self) {
        let viewport = window::widget_size(&self.scrolled);
        let height = viewport.height.round() as i32;
        if height > 0 && self.home.content_height() != height {
            self.home.set_content_height(height);
            self.about.set_size_request(-1, height);
            for area in &self.features {
                area.set_content_height(height);
            }
        }
        let anchor = window::bounds_in(&self.bowl_target, &self.page);
        let mut stage = self.stage.borrow_mut();
        stage.scene.viewport = viewport;
        stage.scene.anchor = anchor;
    }

    fn rearm_timer(&mut self) {
        match self.session.next_deadline() {
            Some(deadline) => {
                let sender = self.sender.clone();
                let now = self.clock();
                self.timer.arm(deadline, now, move || sender.input(AppMsg::Tick));
            }
            None => self.timer.cancel(),
        }
    }

    /// Frame callbacks run only while something moves.
    fn sync_ticker(&mut self) {
        let busy = !self.stage.borrow().is_idle() || !self.scroller.is_idle();
        match (busy, self.ticker.take()) {
            (true, None) => {
                let sender = self.sender.clone();
                self.ticker = Some(self.home.add_tick_callback(move |_, _| {
                    sender.input(AppMsg::Frame);
                    glib::ControlFlow::Continue
                }));
            }
            (true, Some(id)) => self.ticker = Some(id),
            (false, Some(id)) => id.remove(),
            (false, None) => {}
        }
    }

    fn redraw(&self) {
        let opacity = self.stage.borrow().scene.page_opacity;
        self.page.set_opacity(opacity);
        self.home.queue_draw();
        self.clone_layer.queue_draw();
        for area in &self.features {
            area.queue_draw();
        }
    }

    fn reload(&mut self) {
        match config::load_config() {
            Ok(new_config) => {
                if let Err(e) = self.session.retune(new_config.tuning()) {
                    log::error!("Keeping previous tuning: {}", e);
                }
                *self.arts.borrow_mut() = load_arts(&new_config);
                if new_config.kiosk != self.config.kiosk {
                    log::info!("Kiosk mode change applies after a restart");
                }
                self.config = new_config;
                self.rearm_timer();
                self.redraw();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
    }
}
