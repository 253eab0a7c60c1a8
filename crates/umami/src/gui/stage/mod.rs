pub mod model;
pub mod scroll;
pub mod tween;
pub mod view;

pub use model::{BowlArt, Scene, Visual};
pub use scroll::{Glide, PageScroller};
pub use tween::{Playback, Stage};
pub use view::{draw_clone, draw_feature, draw_home, feature_metrics};

pub const BOWL_SIZE: f64 = 120.0; // unscaled bowl diameter
pub const ART_SIZE: i32 = 256;
pub const TRAY_RADIUS: f64 = 110.0;
pub const TRAY_SCALE: f64 = 3.0;
/// The tray sits above the carousel origin.
pub const TRAY_LIFT: f64 = -200.0;
/// Horizontal offset of the carousel origin from the home section's midline.
pub const ORIGIN_SHIFT: f64 = -90.0;

/// Heading and body copy of the sections below the landing section.
pub const FEATURE_COPY: [(&str, &str); 3] = [
    ("Hand-turned bowls", "Every bowl starts as a single block of wood."),
    ("Fresh every morning", "Grains, greens and broths prepared the same day."),
    ("Build your own", "Pick a base, stack your toppings, finish with a sauce."),
];
pub const FEATURE_COUNT: usize = FEATURE_COPY.len();
