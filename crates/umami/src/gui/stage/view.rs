use super::model::{BowlArt, Scene, Visual};
use super::{BOWL_SIZE, FEATURE_COPY, TRAY_LIFT, TRAY_RADIUS, TRAY_SCALE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;
use turntable::reveal::SectionMetrics;
use turntable::{ItemId, Point};

const RIM_WIDTH: f64 = 6.0;
const GRAIN_RINGS: usize = 5;
const HEADING_LINE: f64 = 0.35; // of the section height
const TEXT_GAP: f64 = 64.0;
const STRIPE: f64 = 48.0;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct BowlRenderer<'a> {
    art: &'a BowlArt,
    visual: &'a Visual,
    center: Point,
}

impl<'a> BowlRenderer<'a> {
    fn new(art: &'a BowlArt, visual: &'a Visual, center: Point) -> Self {
        Self {
            art,
            visual,
            center,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if !self.visual.displayed || self.visual.opacity <= 0.0 {
            return Ok(());
        }
        cr.save()?;
        cr.translate(self.center.x, self.center.y);
        cr.rotate(self.visual.rotation.to_radians());
        cr.scale(self.visual.scale, self.visual.scale);

        cr.push_group();
        match &self.art.pixbuf {
            Some(pixbuf) => self.draw_image(cr, pixbuf)?,
            None => {
                self.draw_disc(cr, colors)?;
                self.draw_label(cr, colors)?;
            }
        }
        cr.pop_group_to_source()?;
        cr.paint_with_alpha(self.visual.opacity.clamp(0.0, 1.0))?;
        cr.restore()
    }

    fn draw_image(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        // fit the longer side into the bowl
        let longest = pixbuf.width().max(pixbuf.height()).max(1) as f64;
        let scale = BOWL_SIZE / longest;
        cr.scale(scale, scale);
        cr.set_source_pixbuf(
            pixbuf,
            -pixbuf.width() as f64 / 2.0,
            -pixbuf.height() as f64 / 2.0,
        );
        cr.paint()
    }

    fn draw_disc(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let radius = BOWL_SIZE / 2.0;
        set_color(cr, colors.bowl);
        cr.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
        cr.fill()?;

        set_color(cr, colors.bowl_rim);
        cr.set_line_width(RIM_WIDTH);
        cr.arc(0.0, 0.0, radius - RIM_WIDTH / 2.0, 0.0, 2.0 * PI);
        cr.stroke()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let text = self.art.label.as_str();
        if text.is_empty() {
            return Ok(());
        }
        set_color(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(14.0);
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(-ext.width() / 2.0 - ext.x_bearing(), ext.height() / 2.0);
            cr.show_text(text)?;
        }
        Ok(())
    }
}

fn draw_tray(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let origin = scene.origin();
    cr.save()?;
    cr.translate(origin.x, origin.y + TRAY_LIFT);
    cr.rotate(scene.tray_rotation.to_radians());
    cr.scale(TRAY_SCALE, TRAY_SCALE);

    set_color(cr, colors.tray);
    cr.arc(0.0, 0.0, TRAY_RADIUS, 0.0, 2.0 * PI);
    cr.fill()?;

    // rings and one seam, so turning the tray is visible
    set_color(cr, colors.tray_grain);
    cr.set_line_width(1.5);
    for ring in 1..=GRAIN_RINGS {
        let r = TRAY_RADIUS * ring as f64 / (GRAIN_RINGS + 1) as f64;
        cr.arc(0.0, 0.0, r, 0.0, 2.0 * PI);
        cr.stroke()?;
    }
    cr.move_to(0.0, 0.0);
    cr.line_to(TRAY_RADIUS, 0.0);
    cr.stroke()?;
    cr.restore()
}

/// Tray, then bowls from smallest to largest so the center one ends on top.
pub fn draw_home(
    cr: &Context,
    scene: &Scene,
    arts: &[BowlArt],
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    draw_tray(cr, scene, colors)?;

    let origin = scene.origin();
    let mut order: Vec<ItemId> = ItemId::all().collect();
    order.sort_by(|a, b| scene.bowl(*a).scale.total_cmp(&scene.bowl(*b).scale));
    for item in order {
        let Some(art) = arts.get(item.index()) else {
            continue;
        };
        let visual = scene.bowl(item);
        BowlRenderer::new(art, &visual, origin + visual.position).draw(cr, colors)?;
    }
    Ok(())
}

/// The handoff copy, in page coordinates.
pub fn draw_clone(
    cr: &Context,
    scene: &Scene,
    arts: &[BowlArt],
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let Some(art) = scene.clone_item.and_then(|item| arts.get(item.index())) else {
        return Ok(());
    };
    let center = scene.clone.position
        + Point::new(scene.clone_size.width / 2.0, scene.clone_size.height / 2.0);
    BowlRenderer::new(art, &scene.clone, center).draw(cr, colors)
}

/// Where a feature section's copy rests, for a section `height` tall whose
/// top is `top` pixels below the viewport top.
pub fn feature_metrics(top: f64, height: f64) -> SectionMetrics {
    let heading_top = height * HEADING_LINE;
    SectionMetrics {
        top,
        height,
        heading_top,
        text_top: heading_top + TEXT_GAP,
    }
}

fn draw_backdrop(
    cr: &Context,
    width: f64,
    height: f64,
    backdrop_y: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.feature);
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()?;

    // diagonal stripes, shifted with the background position
    let shift = (backdrop_y - 50.0) / 100.0 * height;
    cr.save()?;
    cr.rectangle(0.0, 0.0, width, height);
    cr.clip();
    set_color(cr, colors.feature_stripe);
    cr.set_line_width(STRIPE / 3.0);
    let mut x = -height;
    while x < width + height {
        cr.move_to(x, shift - STRIPE);
        cr.line_to(x + height, shift + height + STRIPE);
        x += STRIPE;
    }
    cr.stroke()?;
    cr.restore()
}

fn faded(color: Srgba<f64>, opacity: f64) -> Srgba<f64> {
    Srgba::new(color.red, color.green, color.blue, color.alpha * opacity.clamp(0.0, 1.0))
}

/// Text centered on `at.x` with its top edge at `at.y`.
fn draw_centered(
    cr: &Context,
    text: &str,
    size: f64,
    weight: cairo::FontWeight,
    at: Point,
) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, weight);
    cr.set_font_size(size);
    let ext = cr.text_extents(text)?;
    cr.move_to(at.x - ext.width() / 2.0 - ext.x_bearing(), at.y - ext.y_bearing());
    cr.show_text(text)
}

/// One feature section: drifting backdrop, then heading and body copy at
/// their current lift.
pub fn draw_feature(
    cr: &Context,
    scene: &Scene,
    index: usize,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let Some((heading, body)) = FEATURE_COPY.get(index) else {
        return Ok(());
    };
    let feature = scene.feature(index);
    let metrics = feature_metrics(0.0, height);
    draw_backdrop(cr, width, height, feature.backdrop_y, colors)?;

    if feature.heading.opacity > 0.0 {
        set_color(cr, faded(colors.label, feature.heading.opacity));
        let at = Point::new(width / 2.0, metrics.heading_top + feature.heading.lift);
        draw_centered(cr, heading, 40.0, cairo::FontWeight::Bold, at)?;
    }
    if feature.text.opacity > 0.0 {
        set_color(cr, faded(colors.label, feature.text.opacity));
        let at = Point::new(width / 2.0, metrics.text_top + feature.text.lift);
        draw_centered(cr, body, 20.0, cairo::FontWeight::Normal, at)?;
    }
    Ok(())
}
