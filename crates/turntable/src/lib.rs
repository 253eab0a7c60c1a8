pub mod arrangement;
pub mod easing;
pub mod gate;
pub mod geometry;
pub mod handoff;
pub mod macros;
pub mod planner;
pub mod reveal;
pub mod scheduler;
pub mod session;
pub mod slot;
pub mod stage;
pub mod tuning;

pub use arrangement::{Arrangement, ArrangementError, ItemId, Rotation, RotationState};
pub use easing::Easing;
pub use gate::{ScrollDirection, ScrollSample, TransitionGate};
pub use geometry::{Point, Rect, SectionId, Size};
pub use session::CarouselSession;
pub use stage::{Animator, Cue, Props, SceneProbe, ScrollController, SettleToken, Target, Tween};
pub use tuning::{Tuning, TuningError};
