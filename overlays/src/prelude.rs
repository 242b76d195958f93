//! Prelude module for convenient imports.
//!
//! ```ignore
//! use overlays::prelude::*;
//! ```

// Coordinator and configuration
pub use crate::config::{DialogConfig, MenuContent, MenuItem};
pub use crate::coordinator::DialogCoordinator;
pub use crate::error::{ConfigError, OverlayError};

// Parameters
pub use crate::layers::{AlertId, AlertParameter, MenuParameter, ToastDuration};
pub use crate::runtime::{AnimationState, FlyIn, SettleStrategy};

// Host seams
pub use crate::geometry::{SizeF, Vec2};
pub use crate::host::{
    ClickTarget, HeadlessHost, Host, InputGate, Layout, NodeId, Part, Pointer, Surface, Templates,
};
