//! Overlay animator: enter/exit transitions for a single overlay root.
//!
//! Two motions are supported:
//! - [`Motion::FlyIn`]: the root's offset travels from an off-screen origin
//!   (derived from [`FlyIn`] and the reference viewport) to its resting position.
//! - [`Motion::Mask`]: the root's rect mask padding shrinks from the full
//!   extent to zero, revealing the content top-down.
//!
//! Entry and exit use different curves ([`Curves`]): entries are emphasized,
//! exits are a plain ease-out.
//!
//! Re-entrant requests are dropped: while a transition is in flight both
//! [`OverlayAnimator::play`] and [`OverlayAnimator::reverse`] return false and
//! change nothing.

use std::time::Duration;

use serde::Deserialize;

use super::tween::{Easing, Tween};
use crate::geometry::{SizeF, Vec2};
use crate::host::{NodeId, Surface};

/// Off-screen side an overlay enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlyIn {
    /// Stay in place; only meaningful as "use the default" at call sites.
    #[default]
    None,
    FromLeft,
    FromRight,
    FromTop,
    FromBottom,
}

impl FlyIn {
    /// Start offset for an entry from this side.
    pub fn origin(self, viewport: SizeF, current: Vec2) -> Vec2 {
        match self {
            FlyIn::None => current,
            FlyIn::FromLeft => Vec2::new(-viewport.width, 0.0),
            FlyIn::FromRight => Vec2::new(viewport.width, 0.0),
            FlyIn::FromTop => Vec2::new(0.0, viewport.height),
            FlyIn::FromBottom => Vec2::new(0.0, -viewport.height),
        }
    }

    /// Replace [`FlyIn::None`] with `default`.
    pub fn or(self, default: FlyIn) -> FlyIn {
        match self {
            FlyIn::None => default,
            other => other,
        }
    }
}

/// Animation state of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Hidden,
    Displaying,
    Displayed,
    Hiding,
}

impl AnimationState {
    /// True while an enter or exit transition is in flight.
    pub fn is_transitioning(self) -> bool {
        matches!(self, AnimationState::Displaying | AnimationState::Hiding)
    }
}

/// Completion events emitted by [`OverlayAnimator::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorEvent {
    Shown,
    Hidden,
}

/// What property the animator drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    FlyIn { viewport: SizeF },
    Mask { extent: f32 },
}

/// Easing used for entry and exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curves {
    pub enter: Easing,
    pub exit: Easing,
}

impl Default for Curves {
    fn default() -> Self {
        Self {
            enter: Easing::InOutBounce,
            exit: Easing::OutCubic,
        }
    }
}

#[derive(Debug, Clone)]
enum ActiveTween {
    Position(Tween<Vec2>),
    Mask(Tween<f32>),
}

impl ActiveTween {
    fn advance<S: Surface + ?Sized>(
        &mut self,
        dt: Duration,
        target: NodeId,
        surface: &mut S,
    ) -> bool {
        match self {
            ActiveTween::Position(tween) => {
                let done = tween.advance(dt);
                surface.set_offset(target, tween.value());
                done
            }
            ActiveTween::Mask(tween) => {
                let done = tween.advance(dt);
                surface.set_mask(target, tween.value());
                done
            }
        }
    }

    fn set_paused(&mut self, paused: bool) {
        match (self, paused) {
            (ActiveTween::Position(t), true) => t.pause(),
            (ActiveTween::Position(t), false) => t.resume(),
            (ActiveTween::Mask(t), true) => t.pause(),
            (ActiveTween::Mask(t), false) => t.resume(),
        }
    }
}

/// Drives the enter/exit animation of one overlay root.
#[derive(Debug, Clone)]
pub struct OverlayAnimator {
    target: NodeId,
    motion: Motion,
    curves: Curves,
    state: AnimationState,
    tween: Option<ActiveTween>,
    origin: Vec2,
    duration: Duration,
}

impl OverlayAnimator {
    pub fn new(target: NodeId, motion: Motion, curves: Curves) -> Self {
        Self {
            target,
            motion,
            curves,
            state: AnimationState::Hidden,
            tween: None,
            origin: Vec2::ZERO,
            duration: Duration::ZERO,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    /// Update the mask extent used by the next transition.
    pub fn set_extent(&mut self, extent: f32) {
        if let Motion::Mask { extent: current } = &mut self.motion {
            *current = extent;
        }
    }

    /// Begin the entry transition.
    ///
    /// Only starts from [`AnimationState::Hidden`]; `direction` is ignored for
    /// mask motion. Returns false if the request was dropped.
    pub fn play<S: Surface + ?Sized>(
        &mut self,
        direction: FlyIn,
        duration: Duration,
        surface: &mut S,
    ) -> bool {
        if self.state != AnimationState::Hidden {
            log::debug!(
                "animator {}: play dropped in state {:?}",
                self.target,
                self.state
            );
            return false;
        }
        self.duration = duration;
        let tween = match self.motion {
            Motion::FlyIn { viewport } => {
                self.origin = direction.origin(viewport, surface.offset(self.target));
                surface.set_offset(self.target, self.origin);
                ActiveTween::Position(Tween::new(
                    self.origin,
                    Vec2::ZERO,
                    duration,
                    self.curves.enter,
                ))
            }
            Motion::Mask { extent } => {
                surface.set_mask(self.target, extent);
                ActiveTween::Mask(Tween::new(extent, 0.0, duration, self.curves.enter))
            }
        };
        self.tween = Some(tween);
        self.state = AnimationState::Displaying;
        true
    }

    /// Begin the exit transition back to where the entry started.
    ///
    /// Only starts from [`AnimationState::Displayed`]. Returns false if dropped.
    pub fn reverse<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.state != AnimationState::Displayed {
            log::debug!(
                "animator {}: reverse dropped in state {:?}",
                self.target,
                self.state
            );
            return false;
        }
        let tween = match self.motion {
            Motion::FlyIn { .. } => {
                let from = surface.offset(self.target);
                ActiveTween::Position(Tween::new(
                    from,
                    self.origin,
                    self.duration,
                    self.curves.exit,
                ))
            }
            Motion::Mask { extent } => {
                ActiveTween::Mask(Tween::new(0.0, extent, self.duration, self.curves.exit))
            }
        };
        self.tween = Some(tween);
        self.state = AnimationState::Hiding;
        true
    }

    /// Jump to the hidden rest state without animating.
    ///
    /// Used before re-running the entry of an overlay that is already shown.
    /// Dropped while a transition is in flight.
    pub fn snap_hidden<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.is_transitioning() {
            return false;
        }
        match self.motion {
            Motion::FlyIn { .. } => surface.set_offset(self.target, self.origin),
            Motion::Mask { extent } => surface.set_mask(self.target, extent),
        }
        self.tween = None;
        self.state = AnimationState::Hidden;
        true
    }

    pub fn pause(&mut self) {
        if let Some(tween) = &mut self.tween {
            tween.set_paused(true);
        }
    }

    pub fn resume(&mut self) {
        if let Some(tween) = &mut self.tween {
            tween.set_paused(false);
        }
    }

    /// Drop any in-flight tween. Only for teardown.
    pub fn stop(&mut self) {
        self.tween = None;
        self.state = AnimationState::Hidden;
    }

    /// Advance one frame, writing the animated property to `surface`.
    pub fn advance<S: Surface + ?Sized>(
        &mut self,
        dt: Duration,
        surface: &mut S,
    ) -> Option<AnimatorEvent> {
        let tween = self.tween.as_mut()?;
        if !tween.advance(dt, self.target, surface) {
            return None;
        }
        self.tween = None;
        match self.state {
            AnimationState::Displaying => {
                self.state = AnimationState::Displayed;
                Some(AnimatorEvent::Shown)
            }
            AnimationState::Hiding => {
                self.state = AnimationState::Hidden;
                Some(AnimatorEvent::Hidden)
            }
            AnimationState::Hidden | AnimationState::Displayed => None,
        }
    }
}
