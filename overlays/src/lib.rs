//! Transient overlay management: alert dialogs, a dropdown menu and toasts.
//!
//! The [`DialogCoordinator`] is the entry point. It owns a [`Host`] (the
//! application's rendering side, see [`host`]) and is driven frame by frame.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layers;
pub mod prelude;
pub mod registry;
pub mod runtime;

pub use config::DialogConfig;
pub use coordinator::DialogCoordinator;
pub use error::{ConfigError, OverlayError};
pub use host::{ClickTarget, HeadlessHost, Host, NodeId, Part};
