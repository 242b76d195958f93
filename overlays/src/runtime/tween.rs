//! Frame-driven tween engine.
//!
//! A [`Tween`] interpolates a value between two endpoints over a duration
//! with an [`Easing`] curve. Time only moves when the owner calls
//! [`Tween::advance`] with the frame delta, so tweens can be paused, resumed
//! and driven deterministically in tests.

use std::time::Duration;

use crate::geometry::Vec2;

/// Easing function for tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (constant speed)
    #[default]
    Linear,
    /// Ease in (slow start, fast end)
    EaseIn,
    /// Ease out (fast start, slow end)
    EaseOut,
    /// Ease in-out (slow start and end)
    EaseInOut,
    /// Cubic ease out, used for exits.
    OutCubic,
    /// Bounce at the end.
    OutBounce,
    /// Bounce at both ends, used for emphasized entries.
    InOutBounce,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    ///
    /// Returns the eased value (also 0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::OutBounce => out_bounce(t),
            Easing::InOutBounce => {
                if t < 0.5 {
                    (1.0 - out_bounce(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + out_bounce(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

fn out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

/// Values a tween can interpolate.
pub trait Interpolate: Copy {
    fn interpolate(self, target: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(self, target: Self, t: f32) -> Self {
        Vec2::new(
            self.x.interpolate(target.x, t),
            self.y.interpolate(target.y, t),
        )
    }
}

/// A single tween between two values.
#[derive(Debug, Clone)]
pub struct Tween<T: Interpolate> {
    pub from: T,
    pub to: T,
    pub duration: Duration,
    pub easing: Easing,
    elapsed: Duration,
    paused: bool,
    finished: bool,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            elapsed: Duration::ZERO,
            paused: false,
            finished: false,
        }
    }

    /// Pause the tween, keeping its current value.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume from the value the tween was paused at.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Current progress within the tween (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return if self.finished { 1.0 } else { 0.0 };
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Current interpolated value.
    pub fn value(&self) -> T {
        if self.finished {
            return self.to;
        }
        self.from.interpolate(self.to, self.easing.apply(self.progress()))
    }

    /// Move time forward by one frame.
    ///
    /// Returns true exactly once: on the call that completes the tween.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.paused || self.finished {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            self.finished = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_completes_on_first_advance() {
        let mut tween = Tween::new(0.0_f32, 10.0, Duration::ZERO, Easing::Linear);
        assert_eq!(tween.value(), 0.0);
        assert!(tween.advance(Duration::ZERO));
        assert_eq!(tween.value(), 10.0);
        assert!(!tween.advance(Duration::from_millis(16)));
    }

    #[test]
    fn test_paused_tween_holds_value() {
        let mut tween = Tween::new(0.0_f32, 10.0, Duration::from_secs(1), Easing::Linear);
        tween.advance(Duration::from_millis(500));
        tween.pause();
        assert!(!tween.advance(Duration::from_secs(5)));
        assert!((tween.value() - 5.0).abs() < 0.001);
        tween.resume();
        assert!(tween.advance(Duration::from_millis(500)));
    }
}
