use super::{ART_SIZE, BOWL_SIZE, FEATURE_COUNT, ORIGIN_SHIFT};
use crate::config::{BowlConfig, BowlLabel};
use gdk_pixbuf::Pixbuf;
use turntable::reveal::BACKDROP_REST;
use turntable::session::INITIAL_TRAY_ANGLE;
use turntable::slot::SLOT_COUNT;
use turntable::{ItemId, Point, Props, Rect, SceneProbe, Size, Target};

/// Rendered state of one bowl or of the handoff clone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub position: Point,
    pub scale: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub displayed: bool,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            position: Point::default(),
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            displayed: false,
        }
    }
}

impl Visual {
    fn props(&self) -> Props {
        Props::default()
            .position(self.position)
            .scale(self.scale)
            .rotation(self.rotation)
            .opacity(self.opacity)
            .displayed(self.displayed)
    }

    fn apply(&mut self, props: &Props) {
        if let Some(p) = props.position {
            self.position = p;
        }
        if let Some(s) = props.scale {
            self.scale = s;
        }
        if let Some(r) = props.rotation {
            self.rotation = r;
        }
        if let Some(o) = props.opacity {
            self.opacity = o;
        }
        if let Some(d) = props.displayed {
            self.displayed = d;
        }
    }
}

/// Feature copy offset below its resting line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lift {
    pub lift: f64,
    pub opacity: f64,
}

impl Default for Lift {
    fn default() -> Self {
        Self {
            lift: 0.0,
            opacity: 1.0,
        }
    }
}

impl Lift {
    fn props(&self) -> Props {
        Props::default()
            .position(Point::new(0.0, self.lift))
            .opacity(self.opacity)
    }

    fn apply(&mut self, props: &Props) {
        if let Some(p) = props.position {
            self.lift = p.y;
        }
        if let Some(o) = props.opacity {
            self.opacity = o;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVisual {
    pub heading: Lift,
    pub text: Lift,
    /// Background vertical position in percent.
    pub backdrop_y: f64,
}

impl Default for FeatureVisual {
    fn default() -> Self {
        Self {
            heading: Lift::default(),
            text: Lift::default(),
            backdrop_y: BACKDROP_REST,
        }
    }
}

#[derive(Clone)]
pub struct BowlArt {
    pub label: BowlLabel,
    pub pixbuf: Option<Pixbuf>,
}

impl BowlArt {
    pub fn from_config(cfg: &BowlConfig) -> Self {
        let pixbuf = cfg.image.as_ref().and_then(|path| {
            Pixbuf::from_file_at_scale(path, ART_SIZE, ART_SIZE, true)
                .inspect_err(|e| log::warn!("Failed to load bowl image {}: {}", path.display(), e))
                .ok()
        });
        Self {
            label: cfg.label.clone().unwrap_or_else(|| BowlLabel::new("")),
            pixbuf,
        }
    }
}

/// Everything the renderer reads. Bowl positions are relative to the
/// carousel origin; the clone lives in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub bowls: [Visual; SLOT_COUNT],
    pub clone: Visual,
    pub clone_item: Option<ItemId>,
    pub clone_size: Size,
    pub tray_rotation: f64,
    pub page_opacity: f64,
    pub features: Vec<FeatureVisual>,
    pub viewport: Size,
    pub anchor: Option<Rect>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            bowls: [Visual::default(); SLOT_COUNT],
            clone: Visual::default(),
            clone_item: None,
            clone_size: Size::new(BOWL_SIZE, BOWL_SIZE),
            tray_rotation: INITIAL_TRAY_ANGLE,
            page_opacity: 1.0,
            features: vec![FeatureVisual::default(); FEATURE_COUNT],
            viewport: Size::new(1280.0, 800.0),
            anchor: None,
        }
    }
}

impl Scene {
    /// Carousel origin inside the home section, which fills the viewport.
    pub fn origin(&self) -> Point {
        Point::new(
            self.viewport.width / 2.0 + ORIGIN_SHIFT,
            self.viewport.height / 2.0,
        )
    }

    /// Unknown items read as a parked, undisplayed bowl.
    pub fn bowl(&self, item: ItemId) -> Visual {
        self.bowls.get(item.index()).copied().unwrap_or_default()
    }

    pub fn feature(&self, index: usize) -> FeatureVisual {
        self.features.get(index).copied().unwrap_or_default()
    }

    pub fn get(&self, target: Target) -> Props {
        match target {
            Target::Item(item) => self.bowl(item).props(),
            Target::Clone => self.clone.props(),
            Target::Tray => Props::default().rotation(self.tray_rotation),
            Target::Page => Props::default().opacity(self.page_opacity),
            Target::FeatureHeading(i) => self.feature(i).heading.props(),
            Target::FeatureText(i) => self.feature(i).text.props(),
            Target::FeatureBackdrop(i) => {
                Props::default().position(Point::new(0.0, self.feature(i).backdrop_y))
            }
        }
    }

    /// Targets outside the scene are ignored.
    pub fn apply(&mut self, target: Target, props: &Props) {
        match target {
            Target::Item(item) => {
                if let Some(bowl) = self.bowls.get_mut(item.index()) {
                    bowl.apply(props);
                }
            }
            Target::FeatureHeading(i) => {
                if let Some(f) = self.features.get_mut(i) {
                    f.heading.apply(props);
                }
            }
            Target::FeatureText(i) => {
                if let Some(f) = self.features.get_mut(i) {
                    f.text.apply(props);
                }
            }
            Target::FeatureBackdrop(i) => {
                if let (Some(f), Some(p)) = (self.features.get_mut(i), props.position) {
                    f.backdrop_y = p.y;
                }
            }
            Target::Clone => self.clone.apply(props),
            Target::Tray => {
                if let Some(r) = props.rotation {
                    self.tray_rotation = r;
                }
            }
            Target::Page => {
                if let Some(o) = props.opacity {
                    self.page_opacity = o;
                }
            }
        }
    }

    /// Draws on the clone layer from now on as a copy of `item`.
    pub fn prepare_clone(&mut self, item: ItemId, size: Size) {
        self.clone_item = Some(item);
        self.clone_size = size;
    }
}

impl SceneProbe for Scene {
    fn item_rect(&self, item: ItemId) -> Option<Rect> {
        let bowl = self.bowls.get(item.index())?;
        bowl.displayed
            .then(|| Rect::centered_square(self.origin() + bowl.position, BOWL_SIZE))
    }

    fn item_scale(&self, item: ItemId) -> Option<f64> {
        self.bowls.get(item.index()).map(|b| b.scale)
    }

    fn item_rotation(&self, item: ItemId) -> Option<f64> {
        self.bowls.get(item.index()).map(|b| b.rotation)
    }

    fn anchor_rect(&self) -> Option<Rect> {
        self.anchor
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focal_rect_is_centered_on_the_bowl() {
        let mut scene = Scene {
            viewport: Size::new(1000.0, 800.0),
            ..Scene::default()
        };
        let item = ItemId::new(0);
        scene.apply(
            Target::Item(item),
            &Props::default()
                .position(Point::new(180.0, 10.0))
                .displayed(true),
        );
        let rect = scene.item_rect(item).unwrap();
        assert_eq!(rect.center(), Point::new(590.0, 410.0));
        assert_eq!(rect.size, Size::new(BOWL_SIZE, BOWL_SIZE));
    }

    #[test]
    fn hidden_bowl_has_no_rect() {
        let scene = Scene::default();
        assert_eq!(scene.item_rect(ItemId::new(3)), None);
    }

    #[test]
    fn tray_and_page_take_only_their_property() {
        let mut scene = Scene::default();
        let props = Props::default().rotation(150.0).opacity(0.8).scale(4.0);
        scene.apply(Target::Tray, &props);
        scene.apply(Target::Page, &props);
        assert_eq!(scene.tray_rotation, 150.0);
        assert_eq!(scene.page_opacity, 0.8);
        assert_eq!(scene.get(Target::Tray), Props::default().rotation(150.0));
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut scene = Scene::default();
        let before = scene.clone();
        let props = Props::default().position(Point::new(5.0, 5.0)).displayed(true);
        scene.apply(Target::Item(ItemId::new(9)), &props);
        scene.apply(Target::FeatureText(FEATURE_COUNT), &props);
        assert_eq!(scene, before);
        assert_eq!(scene.item_rect(ItemId::new(9)), None);
        assert_eq!(scene.item_scale(ItemId::new(9)), None);
        assert!(!scene.bowl(ItemId::new(9)).displayed);
    }

    #[test]
    fn feature_parts_map_lift_and_backdrop() {
        let mut scene = Scene::default();
        assert_eq!(scene.feature(1).backdrop_y, 50.0);
        scene.apply(
            Target::FeatureHeading(1),
            &Props::default().position(Point::new(0.0, 50.0)).opacity(0.0),
        );
        scene.apply(
            Target::FeatureBackdrop(1),
            &Props::default().position(Point::new(0.0, 65.0)),
        );
        let feature = scene.feature(1);
        assert_eq!(feature.heading, Lift { lift: 50.0, opacity: 0.0 });
        assert_eq!(feature.text, Lift::default());
        assert_eq!(feature.backdrop_y, 65.0);
        assert_eq!(
            scene.get(Target::FeatureBackdrop(1)),
            Props::default().position(Point::new(0.0, 65.0))
        );
    }
}
