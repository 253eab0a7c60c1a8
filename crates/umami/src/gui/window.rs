use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use std::cell::Cell;
use std::rc::Rc;
use turntable::stage::StageError;
use turntable::{Rect, Size};

/// Full-screen signage surface instead of a regular toplevel.
pub fn init_kiosk(window: &gtk::ApplicationWindow) {
    if !gtk4_layer_shell::is_supported() {
        log::warn!("Layer shell unsupported by the compositor, kiosk mode disabled");
        return;
    }
    window.init_layer_shell();
    window.set_layer(Layer::Top);
    window.set_namespace(Some("umami"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::Exclusive);
}

/// Frame-clock playback needs animations enabled in the GTK settings.
pub fn check_animations(widget: &impl IsA<gtk::Widget>) -> Result<(), StageError> {
    if widget.settings().is_gtk_enable_animations() {
        Ok(())
    } else {
        Err(StageError::RenderTargetUnavailable(
            "animations are disabled in the GTK settings".into(),
        ))
    }
}

/// Swallows wheel input on `window` while `locked` is set, handing the
/// vertical delta to `on_pull` instead.
pub fn install_scroll_lock<F>(window: &gtk::ScrolledWindow, locked: Rc<Cell<bool>>, on_pull: F)
where
    F: Fn(f64) + 'static,
{
    let controller = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    controller.set_propagation_phase(gtk::PropagationPhase::Capture);
    controller.connect_scroll(move |_, _, dy| {
        if locked.get() {
            on_pull(dy);
            glib::Propagation::Stop
        } else {
            glib::Propagation::Proceed
        }
    });
    window.add_controller(controller);
}

pub fn bounds_in(widget: &impl IsA<gtk::Widget>, target: &impl IsA<gtk::Widget>) -> Option<Rect> {
    widget.compute_bounds(target).map(|b| {
        Rect::new(
            b.x() as f64,
            b.y() as f64,
            b.width() as f64,
            b.height() as f64,
        )
    })
}

pub fn widget_size(widget: &impl IsA<gtk::Widget>) -> Size {
    Size::new(widget.width() as f64, widget.height() as f64)
}
