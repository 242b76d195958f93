//! Error types.
//!
//! Managers return [`OverlayError`] from their `try_*` methods. The
//! [`DialogCoordinator`](crate::DialogCoordinator) never surfaces them; they
//! are reported through the log and dropped.

use thiserror::Error;

use crate::registry::OverlayKind;

/// A request that could not be carried out by an overlay manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// No live instance matches the request (already closed or never opened).
    #[error("no live {kind} overlay with id '{id}'")]
    NotFound { kind: OverlayKind, id: String },

    /// The requested menu type has no catalog entry.
    #[error("unknown menu type '{0}'")]
    UnknownMenu(String),

    /// The requested menu type has a catalog entry without items.
    #[error("menu type '{0}' has no items")]
    EmptyMenu(String),

    /// An animation is in flight; the request was dropped, not queued.
    #[error("{kind} overlay is mid-transition")]
    InTransition { kind: OverlayKind },
}

impl OverlayError {
    /// Log the error at the level matching its category and swallow it.
    pub fn report(&self) {
        match self {
            OverlayError::NotFound { .. }
            | OverlayError::UnknownMenu(_)
            | OverlayError::EmptyMenu(_) => log::warn!("{}", self),
            OverlayError::InTransition { .. } => log::debug!("dropped request: {}", self),
        }
    }
}

/// Errors that can occur while loading a [`DialogConfig`](crate::config::DialogConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
