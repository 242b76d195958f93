//! Frame-driven runtime pieces shared by every overlay kind.

pub mod animator;
pub mod settle;
pub mod ticker;
pub mod tween;

pub use animator::{AnimationState, AnimatorEvent, Curves, FlyIn, Motion, OverlayAnimator};
pub use settle::{LayoutSettle, SettleStrategy};
pub use ticker::IntervalTicker;
pub use tween::{Easing, Interpolate, Tween};
